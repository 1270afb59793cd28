use crate::{Record, RecordStore, UserValue, statics};
use std::{
    fs,
    io::Read,
    path::PathBuf,
    sync::{Arc, mpsc},
    time::Duration,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("reading {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing user list: {0:#}")]
    Parse(anyhow::Error),
    #[error("expected an array of user objects, found {0}")]
    Shape(String),
    #[error("fetch worker exited without a result")]
    Disconnected,
}

/// Where the user list comes from.
pub trait UserSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch_users(&self) -> Result<Vec<Record>, FetchError>;
}

/// Turn a response body into a collection. The top level must be an array of objects.
pub fn parse_collection(text: &str) -> Result<Vec<Record>, FetchError> {
    let root = UserValue::parse_json5(text).map_err(FetchError::Parse)?;
    let items = match root {
        UserValue::Array(items) => items,
        other => return Err(FetchError::Shape(other.type_name().to_string())),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            UserValue::Object(map) => Ok(Record::from_map(map)),
            other => Err(FetchError::Shape(format!("{} at index {i}", other.type_name()))),
        })
        .collect()
}

/// `GET <url>` with a timeout.
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(statics::USER_AGENT)
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl UserSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch_users(&self) -> Result<Vec<Record>, FetchError> {
        let resp = self.agent.get(&self.url).call().map_err(|e| FetchError::Http {
            url: self.url.clone(),
            source: Box::new(e),
        })?;
        let mut body = String::new();
        resp.into_reader()
            .read_to_string(&mut body)
            .map_err(|source| FetchError::Body {
                url: self.url.clone(),
                source,
            })?;
        parse_collection(&body)
    }
}

/// Reads the user list from a local JSON/JSON5 file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UserSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_users(&self) -> Result<Vec<Record>, FetchError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FetchError::File {
            path: self.path.clone(),
            source,
        })?;
        parse_collection(&text)
    }
}

/// Publish a fetch outcome. Failures are logged and leave the store empty.
pub fn apply_fetch_result(store: &mut RecordStore, result: Result<Vec<Record>, FetchError>) {
    match result {
        Ok(records) => {
            tracing::info!(count = records.len(), "users loaded");
            store.replace_all(records);
        }
        Err(err) => {
            tracing::error!("error fetching users: {err}");
            store.replace_all(Vec::new());
        }
    }
}

/// Fetch on the calling thread and publish the outcome.
pub fn load_users(source: &dyn UserSource, store: &mut RecordStore) {
    tracing::info!(source = %source.describe(), "fetching users");
    apply_fetch_result(store, source.fetch_users());
}

/// A fetch running on a worker thread. Poll it from the thread that owns the store.
pub struct PendingFetch {
    rx: mpsc::Receiver<Result<Vec<Record>, FetchError>>,
}

impl PendingFetch {
    /// `None` while the worker is still running.
    pub fn try_take(&self) -> Option<Result<Vec<Record>, FetchError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(FetchError::Disconnected)),
        }
    }

    /// Block until the worker finishes.
    pub fn wait(self) -> Result<Vec<Record>, FetchError> {
        self.rx.recv().unwrap_or(Err(FetchError::Disconnected))
    }
}

/// Start a fetch on a worker thread. `on_done` runs on the worker once the result is sent.
pub fn spawn_fetch(
    source: Arc<dyn UserSource>,
    on_done: impl FnOnce() + Send + 'static,
) -> PendingFetch {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        tracing::info!(source = %source.describe(), "fetching users");
        // The receiver may be gone if the window closed; nothing to do then.
        let _ = tx.send(source.fetch_users());
        on_done();
    });
    PendingFetch { rx }
}
