use super::*;

/// Tests listing the entries a member has added.
///
/// Expected: only that member's entries, in creation order
#[tokio::test]
async fn returns_entries_for_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db)
        .player_name("Alice")
        .discord_id("1")
        .build()
        .await?;
    WhitelistEntryFactory::new(db)
        .player_name("Bob")
        .discord_id("2")
        .build()
        .await?;
    WhitelistEntryFactory::new(db)
        .player_name("Carol")
        .discord_id("1")
        .build()
        .await?;

    let repo = WhitelistEntryRepository::new(db);
    let entries = repo.get_by_discord_id(1).await?;

    let names: Vec<&str> = entries.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Carol"]);

    Ok(())
}

/// Tests a member without entries.
///
/// Expected: Ok(empty)
#[tokio::test]
async fn returns_empty_for_unknown_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WhitelistEntryRepository::new(db);
    let entries = repo.get_by_discord_id(999).await?;

    assert!(entries.is_empty());

    Ok(())
}
