mod whitelist_entry;
