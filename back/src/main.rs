mod routes;
mod seed;
mod session;
mod views;

use std::{
    collections::HashMap,
    fs, io,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::{sync::Mutex, time};
use uuid::Uuid;

use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "todos", about = "Multi-list todo manager served over HTTP")]
struct Options {
    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Path of the session data file.
    #[arg(long, default_value = "data.ron")]
    data_file: PathBuf,

    /// Seconds between background stores of session data.
    #[arg(long, default_value_t = 300)]
    store_interval: u64,

    /// Install sample lists into fresh sessions.
    #[arg(long)]
    seed: bool,

    /// TLS certificate in PEM format.
    #[arg(long, requires = "key")]
    cert: Option<PathBuf>,

    /// TLS private key in PEM format.
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let options = Options::parse();
    let state = Arc::new(AppState::load(options.data_file.clone(), options.seed)?);

    tokio::spawn({
        let state = state.clone();
        let interval = time::Duration::from_secs(options.store_interval);

        async move {
            loop {
                time::sleep(interval).await;
                if let Err(err) = state.store().await {
                    tracing::error!("Failed to store data: {:?}", err);
                }
            }
        }
    });

    let app = Router::new().merge(routes::router()).with_state(state);
    let addr = SocketAddr::from(([0; 4], options.port));

    tracing::info!(%addr, "todos listening");

    match (&options.cert, &options.key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;
            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

pub struct AppState {
    data_file: PathBuf,
    seed_fresh_sessions: bool,
    pub sessions: Mutex<HashMap<Uuid, Session>>,
}

impl AppState {
    pub fn new(data_file: PathBuf, seed_fresh_sessions: bool) -> Self {
        Self {
            data_file,
            seed_fresh_sessions,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(data_file: PathBuf, seed_fresh_sessions: bool) -> eyre::Result<Self> {
        let file = match fs::File::open(&data_file) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::new(data_file, seed_fresh_sessions));
            }
            Err(err) => eyre::bail!(err),
        };
        let data: DataOwned = ron::de::from_reader(file)?;

        match data {
            DataOwned::V1 { sessions } => {
                Ok(Self::from_v1(data_file, seed_fresh_sessions, sessions))
            }
        }
    }

    fn from_v1(
        data_file: PathBuf,
        seed_fresh_sessions: bool,
        mut sessions: HashMap<Uuid, Session>,
    ) -> Self {
        // Id counters are not persisted; reseed every restored collection.
        for session in sessions.values_mut() {
            session.todos.reseed();
        }

        Self {
            data_file,
            seed_fresh_sessions,
            sessions: Mutex::new(sessions),
        }
    }

    pub async fn store(&self) -> eyre::Result<()> {
        let sessions = self.sessions.lock().await;
        let data = DataBorrowed::V1 {
            sessions: &sessions,
        };

        let file = fs::File::create(&self.data_file)?;
        let mut ron = ron::Serializer::new(file, Some(Default::default()))?;
        data.serialize(&mut ron)?;

        Ok(())
    }

    pub fn fresh_session(&self) -> Session {
        if self.seed_fresh_sessions {
            Session::with_todos(seed::sample_todos())
        } else {
            Session::default()
        }
    }

    /// The session for the given id, created on first sight.
    pub fn session<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, Session>,
        id: Uuid,
    ) -> &'a mut Session {
        sessions.entry(id).or_insert_with(|| self.fresh_session())
    }
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { sessions: &'a HashMap<Uuid, Session> },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { sessions: HashMap<Uuid, Session> },
}
