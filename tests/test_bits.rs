//! Integration tests: bitmap operations.

mod common;

use redikit::BitOp;

#[tokio::test]
async fn set_and_get_bit() {
    let Some((mut r, _)) = common::connect().await else {
        eprintln!("skipping: no Redis server at REDIS_URL");
        return;
    };
    let key = format!("{}_bits", common::test_prefix());

    assert!(!r.set_bit(&key, 7, true).await.unwrap());
    assert!(r.get_bit(&key, 7).await.unwrap());
    assert!(!r.get_bit(&key, 6).await.unwrap());
}

#[tokio::test]
async fn bit_count() {
    let Some((mut r, _)) = common::connect().await else {
        eprintln!("skipping: no Redis server at REDIS_URL");
        return;
    };
    let key = format!("{}_bitcount", common::test_prefix());

    r.set_bit(&key, 0, true).await.unwrap();
    r.set_bit(&key, 3, true).await.unwrap();
    r.set_bit(&key, 12, true).await.unwrap();
    assert_eq!(r.bit_count(&key).await.unwrap(), 3);
}

#[tokio::test]
async fn bit_op_combines_keys() {
    let Some((mut r, _)) = common::connect().await else {
        eprintln!("skipping: no Redis server at REDIS_URL");
        return;
    };
    let prefix = common::test_prefix();
    let a = format!("{prefix}_bop_a");
    let b = format!("{prefix}_bop_b");
    let dest = format!("{prefix}_bop_dest");

    r.set_bit(&a, 0, true).await.unwrap();
    r.set_bit(&a, 1, true).await.unwrap();
    r.set_bit(&b, 1, true).await.unwrap();

    let len = r.bit_op(BitOp::And, &dest, &a, &b).await.unwrap();
    assert_eq!(len, 1);
    assert!(!r.get_bit(&dest, 0).await.unwrap());
    assert!(r.get_bit(&dest, 1).await.unwrap());

    r.bit_op(BitOp::Or, &dest, &a, &b).await.unwrap();
    assert!(r.get_bit(&dest, 0).await.unwrap());

    r.bit_op(BitOp::Xor, &dest, &a, &b).await.unwrap();
    assert!(r.get_bit(&dest, 0).await.unwrap());
    assert!(!r.get_bit(&dest, 1).await.unwrap());

    assert!(r.delete_bitmap(&dest).await.unwrap());
}
