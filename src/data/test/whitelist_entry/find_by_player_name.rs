use super::*;

/// Tests finding an entry by player name.
///
/// Expected: Ok(Some(entry)) with the stored Discord ID parsed
#[tokio::test]
async fn returns_entry() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db)
        .player_name("Steve")
        .discord_id("42")
        .build()
        .await?;

    let repo = WhitelistEntryRepository::new(db);
    let entry = repo.find_by_player_name("Steve").await?;

    assert!(entry.is_some());
    assert_eq!(entry.unwrap().discord_id, 42);

    Ok(())
}

/// Tests looking up a name that was never recorded.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_player() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WhitelistEntryRepository::new(db);
    let entry = repo.find_by_player_name("Nobody").await?;

    assert!(entry.is_none());

    Ok(())
}

/// Tests that a corrupt Discord ID surfaces as an internal error.
///
/// Expected: Err(InternalErr)
#[tokio::test]
async fn fails_on_invalid_discord_id() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db)
        .player_name("Broken")
        .discord_id("not-a-number")
        .build()
        .await?;

    let repo = WhitelistEntryRepository::new(db);
    let result = repo.find_by_player_name("Broken").await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}

/// Tests that lookups ignore the letter case of the player name.
///
/// Expected: Ok(Some(entry)) keeping the name as first recorded
#[tokio::test]
async fn matches_any_letter_case() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db)
        .player_name("Steve")
        .discord_id("42")
        .build()
        .await?;

    let repo = WhitelistEntryRepository::new(db);
    let entry = repo.find_by_player_name("sTEVE").await?;

    assert_eq!(entry.map(|entry| entry.player_name), Some("Steve".to_string()));

    Ok(())
}
