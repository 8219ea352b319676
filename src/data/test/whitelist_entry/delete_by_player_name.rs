use super::*;

/// Tests deleting an entry by player name.
///
/// Expected: Ok(true) and the entry is gone
#[tokio::test]
async fn deletes_entry() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db).player_name("Steve").build().await?;
    WhitelistEntryFactory::new(db).player_name("Alex").build().await?;

    let repo = WhitelistEntryRepository::new(db);
    let deleted = repo.delete_by_player_name("Steve").await?;

    assert!(deleted);
    assert!(repo.find_by_player_name("Steve").await?.is_none());
    assert!(repo.find_by_player_name("Alex").await?.is_some());

    Ok(())
}

/// Tests deleting a name that was never recorded.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_unknown_player() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WhitelistEntryRepository::new(db);
    let deleted = repo.delete_by_player_name("Nobody").await?;

    assert!(!deleted);

    Ok(())
}

/// Tests deleting an entry named in a different letter case.
///
/// Expected: Ok(true) and the entry is gone
#[tokio::test]
async fn deletes_entry_in_any_letter_case() -> Result<(), AppError> {
    let test = TestBuilder::new().with_whitelist_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WhitelistEntryFactory::new(db).player_name("Steve").build().await?;

    let repo = WhitelistEntryRepository::new(db);
    let deleted = repo.delete_by_player_name("STEVE").await?;

    assert!(deleted);
    assert!(repo.find_by_player_name("Steve").await?.is_none());

    Ok(())
}
