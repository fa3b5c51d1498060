use std::str::FromStr;

use inetnum::{addr::Prefix, asn::Asn};
use rov_store::{OriginValidity, PfxRecord, PfxStore, SourceId};

mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

fn rec(prefix: &str, asn: u32, max_len: u8, source: u32) -> PfxRecord {
    PfxRecord::new(
        Prefix::from_str(prefix).unwrap(),
        Asn::from_u32(asn),
        max_len,
        SourceId::from(source),
    )
}

fn validity(store: &PfxStore, asn: u32, announcement: &str) -> OriginValidity {
    store.validate(
        Asn::from_u32(asn),
        Prefix::from_str(announcement).unwrap(),
    )
}

#[test]
fn test_same_record_from_two_sources() -> Result<(), Box<dyn std::error::Error>>
{
    common::init();
    let store = PfxStore::new();

    // Identical authorizations from different sources are different
    // records and share one node.
    store.insert(rec("10.0.0.0/8", 64500, 8, 1))?;
    store.insert(rec("10.0.0.0/8", 64500, 8, 2))?;
    assert_eq!(store.records().len(), 2);

    store.remove_source(SourceId::from(1));
    assert_eq!(store.records().len(), 1);
    assert_eq!(validity(&store, 64500, "10.0.0.0/8"), OriginValidity::Valid);

    store.remove_source(SourceId::from(2));
    assert!(store.records().is_empty());
    assert_eq!(
        validity(&store, 64500, "10.0.0.0/8"),
        OriginValidity::NotFound
    );
    Ok(())
}

#[test]
fn test_withdrawal_leaves_other_sources_alone(
) -> Result<(), Box<dyn std::error::Error>> {
    common::init();
    let store = PfxStore::new();

    let stays = [
        rec("10.0.0.0/8", 64500, 8, 2),
        rec("10.1.0.0/16", 64501, 24, 2),
        rec("2001:db8::/32", 64502, 48, 2),
        rec("192.0.2.0/24", 64503, 24, 3),
    ];
    let goes = [
        rec("10.0.0.0/8", 64510, 8, 1),
        rec("10.1.0.0/16", 64501, 24, 1),
        rec("172.16.0.0/12", 64511, 12, 1),
        rec("2001:db8::/32", 64512, 32, 1),
    ];
    for record in stays.iter().chain(goes.iter()) {
        store.insert(*record)?;
    }

    store.remove_source(SourceId::from(1));

    let left = store.records();
    assert_eq!(left.len(), stays.len());
    for record in stays {
        assert!(left.contains(&record), "{} went missing", record);
    }

    assert_eq!(validity(&store, 64501, "10.1.0.0/24"), OriginValidity::Valid);
    assert_eq!(
        validity(&store, 64511, "172.16.0.0/12"),
        OriginValidity::NotFound
    );
    Ok(())
}

#[test]
fn test_withdrawing_an_unknown_source_changes_nothing(
) -> Result<(), Box<dyn std::error::Error>> {
    common::init();
    let store = PfxStore::new();
    store.insert(rec("10.0.0.0/8", 64500, 8, 1))?;

    store.remove_source(SourceId::from(9));

    assert_eq!(store.records(), vec![rec("10.0.0.0/8", 64500, 8, 1)]);
    Ok(())
}
