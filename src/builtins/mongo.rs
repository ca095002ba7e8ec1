use mongodb::{Client, ClientSession, Database};
use once_cell::sync::OnceCell;

static CLIENT: OnceCell<Client> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

pub struct MongoDB;

impl MongoDB {
    /// Connects the global client. Called once at startup, before the
    /// server accepts requests.
    pub async fn init(&self) {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());
        let db_name = std::env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| "seegest".to_string());

        let client = Client::with_uri_str(&uri)
            .await
            .expect("failed to connect to mongodb");

        CLIENT.set(client).ok();
        DB_NAME.set(db_name).ok();
    }

    pub fn connect(&self) -> Database {
        let client = CLIENT.get().expect("mongodb client not initialized");
        let db_name = DB_NAME.get().expect("mongodb client not initialized");

        client.database(db_name)
    }

    /* DATABASE ACID SESSION */
    pub async fn connect_acid(&self) -> (Database, ClientSession) {
        let client = CLIENT.get().expect("mongodb client not initialized");
        let session = client
            .start_session()
            .await
            .expect("failed to start mongodb session");

        (self.connect(), session)
    }
}
