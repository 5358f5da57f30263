use std::time::Duration;
use std::time::Instant;

use super::*;

use pretty_assertions::assert_eq;

#[test]
fn test_rpc_timeout_zero_is_forever() {
    assert_eq!(RpcTimeout::Forever, RpcTimeout::from_nanos(0));
    assert_eq!(RpcTimeout::Forever, RpcTimeout::from_secs(0));
    assert_eq!(RpcTimeout::Forever, RpcTimeout::from_millis(0));
    assert_eq!(None, RpcTimeout::Forever.duration());

    assert_eq!(
        RpcTimeout::After(Duration::from_secs(3)),
        RpcTimeout::from_secs(3)
    );
    assert_eq!(3_000_000_000, RpcTimeout::from_secs(3).as_nanos());
}

#[test]
fn test_rpc_timeout_as_nanos() {
    assert_eq!(0, RpcTimeout::Forever.as_nanos());

    // a finite timeout never becomes 0 on the wire
    assert_eq!(1, RpcTimeout::After(Duration::from_nanos(0)).as_nanos());

    assert_eq!(
        u64::MAX,
        RpcTimeout::After(Duration::from_secs(u64::MAX)).as_nanos()
    );

    assert_eq!(2_000_000_000, RESOLVE_TIMEOUT.as_nanos());
}

#[test]
fn test_rpc_outcome_status() {
    let ok: RpcOutcome<u64> = RpcOutcome::Ok(3);
    let to: RpcOutcome<u64> = RpcOutcome::Timeout("slow".into());
    let other: RpcOutcome<u64> = RpcOutcome::Other("broken".into());

    assert_eq!(Status::Ok, ok.status());
    assert_eq!(Status::Timeout, to.status());
    assert_eq!(Status::Other, other.status());

    assert_eq!("", ok.error());
    assert_eq!("slow", to.error());
    assert_eq!("broken", other.error());

    assert_eq!(RpcOutcome::Ok("3".to_string()), ok.map(|x| x.to_string()));
    assert_eq!(
        RpcOutcome::Timeout::<String>("slow".into()),
        to.map(|x| x.to_string())
    );
}

#[test]
fn test_configuration_get() {
    let c = Configuration::new(
        5,
        vec![(1, "10.0.0.1:61023").into(), (2, "10.0.0.2:61023").into()],
    );

    assert_eq!(
        Some(&ServerDescriptor::new(2, vec!["10.0.0.2:61023"])),
        c.get(2)
    );
    assert!(c.contains(1));
    assert!(!c.contains(3));
}

#[test]
fn test_change_result_is_ok() {
    assert!(ChangeResult::Ok.is_ok());
    assert!(!ChangeResult::Changed { error: "".into() }.is_ok());
    assert!(!ChangeResult::Bad {
        error: "".into(),
        bad_servers: vec![]
    }
    .is_ok());
}

#[test]
fn test_rpc_timeout_deadline() {
    let now = Instant::now();

    assert_eq!(None, RpcTimeout::Forever.deadline(now));
    assert_eq!(
        Some(now + Duration::from_secs(3)),
        RpcTimeout::from_secs(3).deadline(now)
    );

    // Too far to represent: the wait never expires instead of overflowing.
    assert_eq!(None, RpcTimeout::from_secs(u64::MAX).deadline(now));
    assert_eq!(
        None,
        RpcTimeout::After(Duration::new(u64::MAX, 999_999_999)).deadline(now)
    );
}
