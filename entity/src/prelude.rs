pub use super::whitelist_entry::Entity as WhitelistEntry;
