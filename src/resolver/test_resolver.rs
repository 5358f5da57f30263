use std::time::Duration;

use super::*;
use crate::handle::Call;
use crate::handle::MemCluster;
use crate::model::*;
use crate::ResolveError;

use pretty_assertions::assert_eq;

fn s(id: ServerId) -> ServerDescriptor {
    (id, format!("10.0.0.{}:61023", id)).into()
}

#[test]
fn test_resolve_by_address_and_name() {
    let mut c = MemCluster::with_members(5, vec![s(1)]);
    c.state().add_server(s(2));
    c.state().add_alias("node-2", 2);

    let r = Resolver::default();
    assert_eq!(RESOLVE_TIMEOUT, r.timeout());

    assert_eq!(Ok(s(2)), r.resolve(&mut c, "10.0.0.2:61023"));
    assert_eq!(Ok(s(2)), r.resolve(&mut c, "node-2"));
    assert_eq!(Ok(s(1)), r.resolve(&mut c, "10.0.0.1:61023"));

    // exactly one rpc per resolve
    assert_eq!(
        vec![
            Call::GetServerInfo("10.0.0.2:61023".into(), RESOLVE_TIMEOUT),
            Call::GetServerInfo("node-2".into(), RESOLVE_TIMEOUT),
            Call::GetServerInfo("10.0.0.1:61023".into(), RESOLVE_TIMEOUT),
        ],
        c.calls()
    );
}

#[test]
fn test_resolve_unknown() {
    let mut c = MemCluster::with_members(5, vec![s(1)]);

    let rst = Resolver::default().resolve(&mut c, "node-9");
    assert_eq!(
        Err(ResolveError::Unknown(
            "node-9".into(),
            "no server is known as node-9".into()
        )),
        rst
    );
    assert_eq!("node-9", rst.unwrap_err().token());
}

#[test]
fn test_resolve_timeout_is_not_retried() {
    let mut c = MemCluster::with_members(5, vec![s(1)]);
    let _release = c.hold("10.0.0.1:61023");

    let timeout = RpcTimeout::After(Duration::from_millis(10));
    let rst = Resolver::new(timeout).resolve(&mut c, "10.0.0.1:61023");

    match rst {
        Err(ResolveError::Timeout(token, _)) => assert_eq!("10.0.0.1:61023", token),
        _ => panic!("expect timeout but: {:?}", rst),
    }
    assert_eq!(1, c.calls().len());
}
