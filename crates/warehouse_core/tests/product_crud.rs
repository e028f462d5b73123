use warehouse_core::{
    open_session, open_session_in_memory, Product, ProductRepository, RepoError,
    SqliteProductRepository, SqliteUnitOfWork, UnitOfWork,
};

#[test]
fn widget_roundtrip_after_commit() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);
    let uow = SqliteUnitOfWork::begin(&session).unwrap();

    let widget = Product::new("Widget", 10, 9.99, 1);
    let id = repo.add(&widget).unwrap();
    uow.commit().unwrap();

    let loaded = repo.get(id).unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        loaded,
        Product {
            id: 1,
            name: "Widget".to_string(),
            quantity: 10,
            price: 9.99,
            category: 1,
        }
    );
}

#[test]
fn add_does_not_mutate_the_input_entity() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);

    let product = Product::new("Bolt", 100, 0.25, 3);
    let id = repo.add(&product).unwrap();
    assert!(id > 0);
    assert_eq!(product.id, 0);
    assert!(!product.is_persisted());
}

#[test]
fn non_finite_price_is_rejected_before_staging() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);

    for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = repo.add(&Product::new("odd", 1, price, 1)).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)), "{err}");
    }
    assert!(!session.has_pending_writes());
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn get_unknown_id_is_not_found() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);

    for id in [0, 1, 42, -1] {
        let err = repo.get(id).unwrap_err();
        assert!(
            matches!(err, RepoError::NotFound { entity: "product", id: missing } if missing == id)
        );
    }
}

#[test]
fn staged_writes_are_visible_in_session_before_commit() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);
    let _uow = SqliteUnitOfWork::begin(&session).unwrap();

    let id = repo.add(&Product::new("Nut", 5, 0.1, 2)).unwrap();
    assert!(session.has_pending_writes());
    assert_eq!(repo.get(id).unwrap().name, "Nut");
}

#[test]
fn rollback_discards_staged_product() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);
    let uow = SqliteUnitOfWork::begin(&session).unwrap();

    let id = repo.add(&Product::new("Ghost", 1, 1.0, 1)).unwrap();
    uow.rollback().unwrap();

    assert!(matches!(repo.get(id), Err(RepoError::NotFound { .. })));
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn dropping_unit_of_work_without_commit_discards_writes() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);

    let id = {
        let _uow = SqliteUnitOfWork::begin(&session).unwrap();
        repo.add(&Product::new("Temp", 1, 1.0, 1)).unwrap()
    };

    assert!(!session.has_pending_writes());
    assert!(matches!(repo.get(id), Err(RepoError::NotFound { .. })));
}

#[test]
fn commit_then_new_batch_can_be_rolled_back_independently() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);
    let uow = SqliteUnitOfWork::begin(&session).unwrap();

    let kept = repo.add(&Product::new("Kept", 1, 1.0, 1)).unwrap();
    uow.commit().unwrap();
    let dropped = repo.add(&Product::new("Dropped", 1, 1.0, 1)).unwrap();
    uow.rollback().unwrap();

    assert_eq!(repo.get(kept).unwrap().name, "Kept");
    assert!(repo.get(dropped).is_err());
}

#[test]
fn list_is_idempotent_without_writes() {
    let session = open_session_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&session);
    let uow = SqliteUnitOfWork::begin(&session).unwrap();
    repo.add(&Product::new("A", 1, 1.5, 1)).unwrap();
    repo.add(&Product::new("B", 2, 2.5, 2)).unwrap();
    uow.commit().unwrap();

    let first = repo.list().unwrap();
    let second = repo.list().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn committed_product_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.db");

    let id = {
        let session = open_session(&path).unwrap();
        let repo = SqliteProductRepository::new(&session);
        let uow = SqliteUnitOfWork::begin(&session).unwrap();
        let id = repo.add(&Product::new("Durable", 3, 4.5, 9)).unwrap();
        uow.commit().unwrap();
        uow.close().unwrap();
        id
    };

    let session = open_session(&path).unwrap();
    let repo = SqliteProductRepository::new(&session);
    assert_eq!(repo.get(id).unwrap().name, "Durable");
}

#[test]
fn uncommitted_product_is_lost_when_session_closes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.db");

    let id = {
        let session = open_session(&path).unwrap();
        let repo = SqliteProductRepository::new(&session);
        repo.add(&Product::new("Lost", 1, 1.0, 1)).unwrap()
    };

    let session = open_session(&path).unwrap();
    let repo = SqliteProductRepository::new(&session);
    assert!(matches!(repo.get(id), Err(RepoError::NotFound { .. })));
}

#[test]
fn other_sessions_see_only_committed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.db");

    let writer = open_session(&path).unwrap();
    let reader = open_session(&path).unwrap();
    let writer_repo = SqliteProductRepository::new(&writer);
    let reader_repo = SqliteProductRepository::new(&reader);

    let uow = SqliteUnitOfWork::begin(&writer).unwrap();
    let id = writer_repo.add(&Product::new("Pending", 1, 1.0, 1)).unwrap();
    assert!(reader_repo.get(id).is_err());

    uow.commit().unwrap();
    assert_eq!(reader_repo.get(id).unwrap().name, "Pending");
}
