pub mod database_admin_client;
