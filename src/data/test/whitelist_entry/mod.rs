use crate::{
    data::whitelist_entry::WhitelistEntryRepository, error::AppError,
    model::whitelist_entry::CreateWhitelistEntryParam,
};
use test_utils::{builder::TestBuilder, factory::whitelist_entry::WhitelistEntryFactory};

mod create;
mod delete_by_player_name;
mod find_by_player_name;
mod get_by_discord_id;
