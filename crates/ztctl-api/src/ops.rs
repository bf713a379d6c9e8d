//! Resource operations: one API call (or a sequential fan-out) followed by
//! rendering of the result.
//!
//! Request failures are reported on the output and the operation carries on
//! with an empty result. Only rendering and output failures are returned.

use crate::client::{Exchange, ZeroTierApi};
use crate::display::{Envelope, ViewOptions};
use crate::models::{MemberPost, NetworkPost};
use crate::probe::resolve_owner_id;
use crate::Result;
use serde_json::Value;
use std::io::Write;
use tracing::{debug, warn};

/// Operations against ZeroTier Central writing their results to `out`.
pub struct Operations<'a, A: ?Sized, W> {
    api: &'a A,
    view: ViewOptions,
    out: W,
}

impl<'a, A, W> Operations<'a, A, W>
where
    A: ZeroTierApi + ?Sized,
    W: Write,
{
    /// Create a new set of operations.
    pub fn new(api: &'a A, view: ViewOptions, out: W) -> Self {
        Self { api, view, out }
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// List all networks.
    pub async fn list_networks(&mut self) -> Result<()> {
        let outcome = self.api.list_networks().await;
        let networks = self.settle(outcome)?.unwrap_or_default();
        self.show(&Envelope::Networks(networks))
    }

    /// Create a network and apply `conf` to it.
    pub async fn create_network(&mut self, conf: &NetworkPost) -> Result<()> {
        let outcome = self.api.create_network().await;
        let created = self.settle(outcome)?.unwrap_or_default();

        match created.get("id").and_then(Value::as_str) {
            Some(nid) => {
                debug!(nid, "network created");
                self.set_network(nid, conf).await
            }
            None => {
                warn!("created network carries no id; settings not applied");
                Ok(())
            }
        }
    }

    /// Apply `conf` to network `nid`.
    pub async fn set_network(&mut self, nid: &str, conf: &NetworkPost) -> Result<()> {
        let outcome = self.api.update_network(nid, conf).await;
        let network = self.settle(outcome)?.unwrap_or_default();
        self.show(&Envelope::Network(network))
    }

    /// Delete network `nid`.
    pub async fn delete_network(&mut self, nid: &str) -> Result<()> {
        let outcome = self.api.delete_network(nid).await;
        self.report_status(outcome)
    }

    /// List the members of `nid`, or of every network when `nid` is `None`.
    ///
    /// Networks are visited one after the other in listing order.
    pub async fn list_members(&mut self, nid: Option<&str>) -> Result<()> {
        if let Some(nid) = nid {
            return self.list_network_members(nid).await;
        }

        let outcome = self.api.list_networks().await;
        let networks = self.settle(outcome)?.unwrap_or_default();
        for network in &networks {
            match network.id.as_deref() {
                Some(nid) if !nid.is_empty() => self.list_network_members(nid).await?,
                _ => warn!("skipping network without id"),
            }
        }
        Ok(())
    }

    /// Apply `conf` to member `mid` of network `nid`.
    pub async fn set_member(&mut self, nid: &str, mid: &str, conf: &MemberPost) -> Result<()> {
        let outcome = self.api.update_member(nid, mid, conf).await;
        let member = self.settle(outcome)?.unwrap_or_default();
        self.show(&Envelope::Member(member))
    }

    /// Delete member `mid` of network `nid`.
    pub async fn delete_member(&mut self, nid: &str, mid: &str) -> Result<()> {
        let outcome = self.api.delete_member(nid, mid).await;
        self.report_status(outcome)
    }

    /// Dump the user record of `uid`, looking up the caller's own id when
    /// none (or an empty one) is given.
    pub async fn dump_user_record(&mut self, uid: Option<&str>) -> Result<()> {
        let uid = match uid.filter(|uid| !uid.is_empty()) {
            Some(uid) => Some(uid.to_owned()),
            None => resolve_owner_id(self.api).await.owner_id,
        };
        let Some(uid) = uid.filter(|uid| !uid.is_empty()) else {
            writeln!(self.out, "** Failed to get UID")?;
            return Ok(());
        };

        let outcome = self.api.get_user(&uid).await;
        let record = self.settle(outcome)?.unwrap_or_default();
        self.show(&Envelope::Raw(record))
    }

    async fn list_network_members(&mut self, nid: &str) -> Result<()> {
        let outcome = self.api.list_members(nid).await;
        let members = self.settle(outcome)?.unwrap_or_default();

        writeln!(self.out, "-- net: {nid}")?;
        self.show(&Envelope::Members(members))?;
        writeln!(self.out)?;
        Ok(())
    }

    fn show(&mut self, envelope: &Envelope) -> Result<()> {
        envelope.render(&self.view, &mut self.out)
    }

    /// Report a failed exchange on the output and pass on the decoded body of
    /// a successful one.
    fn settle<R>(&mut self, outcome: Result<Exchange<R>>) -> Result<Option<R>> {
        match outcome {
            Ok(exchange) if exchange.is_ok() => Ok(exchange.into_data()),
            Ok(exchange) => {
                writeln!(self.out, "status: {}", exchange.status_line())?;
                Ok(None)
            }
            Err(err) => {
                writeln!(self.out, "** error: {err}")?;
                Ok(None)
            }
        }
    }

    fn report_status(&mut self, outcome: Result<Exchange<()>>) -> Result<()> {
        match outcome {
            Ok(exchange) => writeln!(self.out, "status: {}", exchange.status_line())?,
            Err(err) => writeln!(self.out, "** error: {err}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockZeroTierApi, ZtClient};
    use crate::models::{JsonMap, MemberInfo, MemberPostConfig, NetworkInfo};
    use mockall::predicate::{always, eq};
    use reqwest::StatusCode;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use ztctl_core::Error;

    fn ok<R>(data: R) -> Result<Exchange<R>> {
        Ok(Exchange {
            status: StatusCode::OK,
            data: Some(data),
        })
    }

    fn status<R>(status: StatusCode) -> Result<Exchange<R>> {
        Ok(Exchange { status, data: None })
    }

    fn named(id: &str) -> NetworkInfo {
        NetworkInfo {
            id: Some(id.to_string()),
            ..NetworkInfo::default()
        }
    }

    fn output<A: ZeroTierApi + ?Sized>(ops: Operations<'_, A, Vec<u8>>) -> String {
        String::from_utf8(ops.into_output()).unwrap()
    }

    #[tokio::test]
    async fn member_fan_out_is_sequential() {
        let mut api = MockZeroTierApi::new();
        let mut sequence = mockall::Sequence::new();
        api.expect_list_networks()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| ok(vec![named("n1"), named("n2")]));
        api.expect_list_members()
            .with(eq("n1"))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| ok(Vec::new()));
        api.expect_list_members()
            .with(eq("n2"))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| {
                ok(vec![MemberInfo {
                    node_id: Some("a1b2c3d4e5".into()),
                    ..MemberInfo::default()
                }])
            });

        let mut ops = Operations::new(&api, ViewOptions::new("json").with_verbose(true), Vec::new());
        ops.list_members(None).await.unwrap();

        let out = output(ops);
        assert!(out.starts_with("-- net: n1\n<empty>\n\n-- net: n2\n-- netm 0: a1b2c3d4e5\n"));
        assert!(out.ends_with("}\n\n"));
    }

    #[tokio::test]
    async fn fan_out_skips_networks_without_id() {
        let mut api = MockZeroTierApi::new();
        api.expect_list_networks()
            .returning(|| ok(vec![NetworkInfo::default(), named("n2")]));
        api.expect_list_members()
            .with(eq("n2"))
            .times(1)
            .returning(|_| ok(Vec::new()));

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.list_members(None).await.unwrap();
        assert_eq!(output(ops), "-- net: n2\n<empty>\n\n");
    }

    #[tokio::test]
    async fn transport_error_is_reported_and_listing_continues() {
        let mut api = MockZeroTierApi::new();
        api.expect_list_networks()
            .returning(|| Err(Error::ServiceUnavailable("connection refused".into())));

        let mut ops = Operations::new(&api, ViewOptions::new("yaml"), Vec::new());
        ops.list_networks().await.unwrap();
        assert_eq!(
            output(ops),
            "** error: Service unavailable: connection refused\n<empty>\n"
        );
    }

    #[tokio::test]
    async fn non_ok_status_is_reported() {
        let mut api = MockZeroTierApi::new();
        api.expect_list_members()
            .returning(|_| status(StatusCode::NOT_FOUND));

        let mut ops = Operations::new(&api, ViewOptions::new("yaml"), Vec::new());
        ops.list_members(Some("gone")).await.unwrap();
        assert_eq!(
            output(ops),
            "status: 404 Not Found\n-- net: gone\n<empty>\n\n"
        );
    }

    #[tokio::test]
    async fn delete_prints_status_line() {
        let mut api = MockZeroTierApi::new();
        api.expect_delete_network()
            .with(eq("n1"))
            .returning(|_| status(StatusCode::OK));
        api.expect_delete_member()
            .with(eq("n1"), eq("m1"))
            .returning(|_, _| Err(Error::Timeout("operation timed out".into())));

        let mut ops = Operations::new(&api, ViewOptions::new("yaml"), Vec::new());
        ops.delete_network("n1").await.unwrap();
        ops.delete_member("n1", "m1").await.unwrap();
        assert_eq!(
            output(ops),
            "status: 200 OK\n** error: Timeout: operation timed out\n"
        );
    }

    #[tokio::test]
    async fn create_applies_settings_to_new_network() {
        let mut api = MockZeroTierApi::new();
        let mut sequence = mockall::Sequence::new();
        api.expect_create_network()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| {
                let mut map = JsonMap::new();
                map.insert("id".into(), json!("n9"));
                ok(map)
            });
        api.expect_update_network()
            .with(eq("n9"), always())
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|nid, _| ok(named(nid)));

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.create_network(&NetworkPost::default()).await.unwrap();
        assert_eq!(output(ops), "{\n\t\"id\": \"n9\"\n}\n");
    }

    #[tokio::test]
    async fn create_without_id_does_not_update() {
        let mut api = MockZeroTierApi::new();
        api.expect_create_network()
            .returning(|| status(StatusCode::FORBIDDEN));
        api.expect_update_network().never();

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.create_network(&NetworkPost::default()).await.unwrap();
        assert_eq!(output(ops), "status: 403 Forbidden\n");
    }

    #[tokio::test]
    async fn failed_update_renders_empty_network() {
        let mut api = MockZeroTierApi::new();
        api.expect_update_network()
            .returning(|_, _| status(StatusCode::BAD_REQUEST));

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.set_network("n1", &NetworkPost::default()).await.unwrap();
        assert_eq!(output(ops), "status: 400 Bad Request\n{}\n");
    }

    #[tokio::test]
    async fn user_record_without_uid_uses_probe() {
        let mut api = MockZeroTierApi::new();
        api.expect_create_network().returning(|| {
            let mut map = JsonMap::new();
            map.insert("id".into(), json!("tmp"));
            map.insert("ownerId".into(), json!("u-42"));
            ok(map)
        });
        api.expect_delete_network()
            .with(eq("tmp"))
            .times(1)
            .returning(|_| status(StatusCode::OK));
        api.expect_get_user().with(eq("u-42")).times(1).returning(|_| {
            let mut map = JsonMap::new();
            map.insert("id".into(), json!("u-42"));
            ok(map)
        });

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.dump_user_record(None).await.unwrap();
        assert_eq!(output(ops), "{\n\t\"id\": \"u-42\"\n}\n");
    }

    #[tokio::test]
    async fn unresolved_uid_is_reported() {
        let mut api = MockZeroTierApi::new();
        api.expect_create_network()
            .returning(|| Err(Error::HttpError("boom".into())));
        api.expect_delete_network().never();
        api.expect_get_user().never();

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.dump_user_record(None).await.unwrap();
        assert_eq!(output(ops), "** Failed to get UID\n");
    }

    #[tokio::test]
    async fn empty_uid_looks_up_owner() {
        let mut api = MockZeroTierApi::new();
        api.expect_create_network().times(1).returning(|| {
            let mut map = JsonMap::new();
            map.insert("id".into(), json!("tmp"));
            map.insert("ownerId".into(), json!("u-42"));
            ok(map)
        });
        api.expect_delete_network()
            .with(eq("tmp"))
            .times(1)
            .returning(|_| status(StatusCode::OK));
        api.expect_get_user()
            .with(eq("u-42"))
            .times(1)
            .returning(|_| ok(JsonMap::new()));

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.dump_user_record(Some("")).await.unwrap();
        assert_eq!(output(ops), "{}\n");
    }

    #[tokio::test]
    async fn user_record_with_nulls_renders_as_toml() {
        let mut api = MockZeroTierApi::new();
        api.expect_get_user().with(eq("u-1")).returning(|_| {
            let mut map = JsonMap::new();
            map.insert("id".into(), json!("u-1"));
            map.insert("smsNumber".into(), json!(null));
            ok(map)
        });

        let mut ops = Operations::new(&api, ViewOptions::new("toml"), Vec::new());
        ops.dump_user_record(Some("u-1")).await.unwrap();
        assert_eq!(output(ops), "id = \"u-1\"\n\n");
    }

    #[tokio::test]
    async fn explicit_uid_skips_probe() {
        let mut api = MockZeroTierApi::new();
        api.expect_create_network().never();
        api.expect_get_user()
            .with(eq("u-1"))
            .returning(|_| ok(JsonMap::new()));

        let mut ops = Operations::new(&api, ViewOptions::new("json"), Vec::new());
        ops.dump_user_record(Some("u-1")).await.unwrap();
        assert_eq!(output(ops), "{}\n");
    }

    #[tokio::test]
    async fn network_table_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/network"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "net1",
                    "config": {
                        "name": "office",
                        "private": true,
                        "creationTime": 0,
                        "routes": [{ "target": "10.0.0.0/24" }]
                    },
                    "onlineMemberCount": 1,
                    "totalMemberCount": 2,
                    "authorizedMemberCount": 2
                },
                {
                    "id": "net2",
                    "config": { "name": "lab", "private": false, "creationTime": 0 },
                    "onlineMemberCount": 0,
                    "totalMemberCount": 1,
                    "authorizedMemberCount": 0
                }
            ])))
            .mount(&server)
            .await;

        let client = ZtClient::new(server.uri(), SecretString::from("t".to_string())).unwrap();
        let mut ops = Operations::new(&client, ViewOptions::new("yaml"), Vec::new());
        ops.list_networks().await.unwrap();

        let out = output(ops);
        let rows: Vec<Vec<&str>> = out
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            ["NID", "Name", "Route", "Private", "O/T/A", "CreationTime"]
        );
        assert_eq!(&rows[1][..5], ["net1", "office", "10.0.0.0/24", "true", "1/2/2"]);
        assert_eq!(&rows[2][..5], ["net2", "lab", "-", "false", "0/1/0"]);
        assert_eq!(rows[1][5], rows[2][5]);
    }

    #[tokio::test]
    async fn member_update_posts_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/network/n1/member/m1"))
            .and(body_json(json!({"name": "printer", "config": {"authorized": true}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nodeId": "m1",
                "name": "printer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZtClient::new(server.uri(), SecretString::from("t".to_string())).unwrap();
        let conf = MemberPost {
            name: Some("printer".into()),
            config: Some(MemberPostConfig {
                authorized: Some(true),
                ..MemberPostConfig::default()
            }),
            ..MemberPost::default()
        };
        let mut ops = Operations::new(&client, ViewOptions::new("yaml"), Vec::new());
        ops.set_member("n1", "m1", &conf).await.unwrap();
        assert_eq!(output(ops), "name: printer\nnodeId: m1\n\n");
    }
}
