use std::str::FromStr;

use inetnum::{addr::Prefix, asn::Asn};
use rov_store::{PfxRecord, PfxStore, PfxStoreError, SourceId};

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

// Order-insensitive comparison; the store makes no promises about the
// order of its snapshot.
fn assert_same_records(left: &[PfxRecord], right: &[PfxRecord]) {
    assert_eq!(left.len(), right.len());
    for record in left {
        assert!(right.contains(record), "{} missing", record);
    }
}

#[test]
fn test_insert_then_remove_restores_the_store(
) -> Result<(), Box<dyn std::error::Error>> {
    common::init();
    let store = PfxStore::new();
    let base = [
        rec("10.0.0.0/8", 64500, 8, 1),
        rec("10.1.0.0/16", 64501, 24, 1),
        rec("10.1.128.0/17", 64502, 24, 2),
        rec("192.0.2.0/24", 64503, 24, 1),
        rec("2001:db8::/32", 64504, 48, 1),
    ];
    for record in base {
        store.insert(record)?;
    }
    let before = store.records();

    // A record whose node displaces an existing payload on the way in,
    // so that removing it exercises the promotion path too.
    let visitor = rec("10.1.0.0/28", 64505, 28, 2);
    store.insert(visitor)?;
    assert_eq!(store.records().len(), base.len() + 1);
    store.remove(visitor)?;

    assert_same_records(&store.records(), &before);
    Ok(())
}

#[test]
fn test_double_insert_and_double_remove() -> Result<(), Box<dyn std::error::Error>>
{
    common::init();
    let store = PfxStore::new();
    let record = rec("10.0.0.0/8", 64500, 24, 1);

    store.insert(record)?;
    assert_eq!(store.insert(record), Err(PfxStoreError::DuplicateRecord));

    store.remove(record)?;
    assert_eq!(store.remove(record), Err(PfxStoreError::RecordNotFound));
    assert!(store.records().is_empty());
    Ok(())
}

#[test]
fn test_records_differing_in_one_field_coexist(
) -> Result<(), Box<dyn std::error::Error>> {
    common::init();
    let store = PfxStore::new();

    let records = [
        rec("10.0.0.0/8", 64500, 24, 1),
        rec("10.0.0.0/8", 64501, 24, 1),
        rec("10.0.0.0/8", 64500, 32, 1),
        rec("10.0.0.0/8", 64500, 24, 2),
    ];
    for record in records {
        store.insert(record)?;
    }
    assert_same_records(&store.records(), &records);

    store.remove(records[0])?;
    assert_same_records(&store.records(), &records[1..]);
    Ok(())
}

#[test]
fn test_snapshot_sees_both_families() -> Result<(), Box<dyn std::error::Error>>
{
    common::init();
    let store = PfxStore::new();
    let v4 = rec("10.0.0.0/8", 64500, 8, 1);
    let v6 = rec("2001:db8::/32", 64500, 32, 1);

    store.insert(v4)?;
    store.insert(v6)?;
    assert_same_records(&store.records(), &[v4, v6]);

    store.remove(v4)?;
    assert_same_records(&store.records(), &[v6]);
    Ok(())
}
