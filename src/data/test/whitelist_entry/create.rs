use super::*;

/// Tests recording a new whitelist entry.
///
/// Expected: Ok with the member's ID and name stored
#[tokio::test]
async fn creates_entry() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WhitelistEntryRepository::new(db);
    let entry = repo
        .create(CreateWhitelistEntryParam {
            player_name: "Steve".to_string(),
            discord_id: 123456789012345678,
            discord_name: "steve_irl".to_string(),
        })
        .await?;

    assert_eq!(entry.player_name, "Steve");
    assert_eq!(entry.discord_id, 123456789012345678);
    assert_eq!(entry.discord_name, "steve_irl");

    Ok(())
}

/// Tests that a player name can only be recorded once.
///
/// Expected: Err(DbErr) on the second insert
#[tokio::test]
async fn rejects_duplicate_player_name() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db).player_name("Alex").build().await?;

    let repo = WhitelistEntryRepository::new(db);
    let result = repo
        .create(CreateWhitelistEntryParam {
            player_name: "Alex".to_string(),
            discord_id: 1,
            discord_name: "someone".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}

/// Tests that the same name in another letter case counts as a duplicate.
///
/// Expected: Err(DbErr) on the second insert
#[tokio::test]
async fn rejects_duplicate_in_other_case() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db).player_name("Alex").build().await?;

    let repo = WhitelistEntryRepository::new(db);
    let result = repo
        .create(CreateWhitelistEntryParam {
            player_name: "alex".to_string(),
            discord_id: 1,
            discord_name: "someone".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
