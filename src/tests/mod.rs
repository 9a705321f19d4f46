mod unit_config;
mod unit_session_store;
mod unit_sqlite_repository;
