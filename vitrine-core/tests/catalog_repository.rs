use anyhow::Result;
use vitrine_core::{
    GalleryError, ImageId, NewImage, domain::ordering::OrderAssignment,
};

mod support;

#[tokio::test]
async fn insert_assigns_ids_and_get_roundtrips() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    let first = catalog.insert(&NewImage::new("a.png", 0)).await?;
    let second = catalog.insert(&NewImage::new("b.png", 1)).await?;
    assert!(second.id > first.id);

    let fetched = catalog.get(first.id).await?.expect("row exists");
    assert_eq!(fetched, first);
    assert_eq!(fetched.title, None);
    assert_eq!(catalog.count().await?, 2);
    assert!(catalog.get(ImageId(9_999)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn filenames_are_unique() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    catalog.insert(&NewImage::new("dup.png", 0)).await?;
    let err = catalog.insert(&NewImage::new("dup.png", 1)).await.unwrap_err();
    assert!(matches!(err, GalleryError::Database(_)));
    assert_eq!(catalog.count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn list_breaks_order_ties_by_id() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    let a = catalog.insert(&NewImage::new("a.png", 1)).await?;
    let b = catalog.insert(&NewImage::new("b.png", 0)).await?;
    let c = catalog.insert(&NewImage::new("c.png", 1)).await?;
    let d = catalog.insert(&NewImage::new("d.png", 0)).await?;

    let first: Vec<ImageId> =
        catalog.list().await?.into_iter().map(|r| r.id).collect();
    let second: Vec<ImageId> =
        catalog.list().await?.into_iter().map(|r| r.id).collect();

    assert_eq!(first, vec![b.id, d.id, a.id, c.id]);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn update_replaces_mutable_fields_only() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    let original = catalog.insert(&NewImage::new("a.png", 0)).await?;
    let mut changed = original.clone();
    changed.title = Some("Harbour".into());
    changed.order = 5;
    changed.filename = "1.png".into();

    let updated = catalog.update(&changed).await?;
    assert_eq!(updated.title.as_deref(), Some("Harbour"));
    assert_eq!(updated.order, 5);
    assert_eq!(updated.filename, "1.png");
    assert_eq!(updated.created_at, original.created_at);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_of_missing_rows_are_not_found() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    let mut ghost = catalog.insert(&NewImage::new("a.png", 0)).await?;
    catalog.delete(ghost.id).await?;

    ghost.title = Some("gone".into());
    assert!(catalog.update(&ghost).await.unwrap_err().is_not_found());
    assert!(catalog.delete(ghost.id).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn set_orders_is_all_or_nothing() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let catalog = support::database(&tempdir).await?.catalog();

    let a = catalog.insert(&NewImage::new("a.png", 0)).await?;
    let b = catalog.insert(&NewImage::new("b.png", 1)).await?;

    let err = catalog
        .set_orders(&[
            OrderAssignment { id: b.id, order: 0 },
            OrderAssignment {
                id: ImageId(424_242),
                order: 1,
            },
        ])
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let unchanged = catalog.get(b.id).await?.expect("row exists");
    assert_eq!(unchanged.order, 1);

    catalog
        .set_orders(&[
            OrderAssignment { id: b.id, order: 0 },
            OrderAssignment { id: a.id, order: 1 },
        ])
        .await?;
    let ids: Vec<ImageId> =
        catalog.list().await?.into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    Ok(())
}
