//! Local persistence
//!
//! [`FileRepository`] stores one JSON file per key. [`LocalState`] is the
//! typed, best-effort layer the reducer talks to: reads treat missing or
//! corrupt blobs as absent, writes log and carry on. Nothing here can fail
//! a kiosk operation.

use crate::types::{CartLine, CustomerProfile, Product, Reservation, SaleRecord};
use pickup_core::environment::{RepositoryError, StateRepository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Names of the persisted blobs
pub mod keys {
    /// Catalog snapshot
    pub const PRODUCTS: &str = "products";
    /// Cart lines
    pub const CART: &str = "cart";
    /// Active reservation
    pub const RESERVATION: &str = "reservation";
    /// Customer profile
    pub const PROFILE: &str = "profile";
    /// Favorite product ids
    pub const FAVORITES: &str = "favorites";
    /// Dark mode flag
    pub const THEME: &str = "theme";
    /// Local sales history
    pub const SALES: &str = "sales";
}

/// [`StateRepository`] backed by `<dir>/<key>.json` files
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous blob intact.
#[derive(Clone, Debug)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    /// Open (and create if needed) the data directory
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| RepositoryError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the blobs
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateRepository for FileRepository {
    fn load(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RepositoryError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let target = self.path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let io_error = |source| RepositoryError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::write(&tmp, value).map_err(io_error)?;
        std::fs::rename(&tmp, &target).map_err(io_error)
    }

    fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RepositoryError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Typed, best-effort view over a [`StateRepository`]
#[derive(Clone)]
pub struct LocalState {
    repo: Arc<dyn StateRepository>,
}

impl std::fmt::Debug for LocalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalState").finish_non_exhaustive()
    }
}

impl LocalState {
    /// Wrap a repository
    #[must_use]
    pub fn new(repo: Arc<dyn StateRepository>) -> Self {
        Self { repo }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.repo.load(key) {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(key, %error, "Failed to read local state");
                metrics::counter!("kiosk.persistence.failures", "op" => "read").increment(1);
                return None;
            },
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, %error, "Ignoring corrupt local state");
                metrics::counter!("kiosk.persistence.failures", "op" => "decode").increment(1);
                None
            },
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
            .and_then(|json| self.repo.save(key, &json));

        if let Err(error) = result {
            tracing::warn!(key, %error, "Failed to persist local state");
            metrics::counter!("kiosk.persistence.failures", "op" => "write").increment(1);
        }
    }

    fn delete(&self, key: &str) {
        if let Err(error) = self.repo.remove(key) {
            tracing::warn!(key, %error, "Failed to remove local state");
            metrics::counter!("kiosk.persistence.failures", "op" => "remove").increment(1);
        }
    }

    /// Last catalog snapshot
    #[must_use]
    pub fn load_products(&self) -> Option<Vec<Product>> {
        self.read(keys::PRODUCTS)
    }

    /// Replace the catalog snapshot
    pub fn save_products(&self, products: &[Product]) {
        self.write(keys::PRODUCTS, products);
    }

    /// Persisted cart lines
    #[must_use]
    pub fn load_cart(&self) -> Option<Vec<CartLine>> {
        self.read(keys::CART)
    }

    /// Persist cart lines
    pub fn save_cart(&self, lines: &[CartLine]) {
        self.write(keys::CART, lines);
    }

    /// Persisted reservation, not yet verified against the backend
    #[must_use]
    pub fn load_reservation(&self) -> Option<Reservation> {
        self.read(keys::RESERVATION)
    }

    /// Persist the active reservation
    pub fn save_reservation(&self, reservation: &Reservation) {
        self.write(keys::RESERVATION, reservation);
    }

    /// Forget the persisted reservation
    pub fn clear_reservation(&self) {
        self.delete(keys::RESERVATION);
    }

    /// Saved customer profile
    #[must_use]
    pub fn load_profile(&self) -> Option<CustomerProfile> {
        self.read(keys::PROFILE)
    }

    /// Save the customer profile
    pub fn save_profile(&self, profile: &CustomerProfile) {
        self.write(keys::PROFILE, profile);
    }

    /// Favorite product ids
    #[must_use]
    pub fn load_favorites(&self) -> Option<Vec<u64>> {
        self.read(keys::FAVORITES)
    }

    /// Persist favorite product ids
    pub fn save_favorites(&self, favorites: &[u64]) {
        self.write(keys::FAVORITES, favorites);
    }

    /// Dark mode flag
    #[must_use]
    pub fn load_dark_mode(&self) -> Option<bool> {
        self.read(keys::THEME)
    }

    /// Persist the dark mode flag
    pub fn save_dark_mode(&self, dark_mode: bool) {
        self.write(keys::THEME, &dark_mode);
    }

    /// Local sales history, oldest first
    #[must_use]
    pub fn load_sales(&self) -> Vec<SaleRecord> {
        self.read(keys::SALES).unwrap_or_default()
    }

    /// Append a sale to the local history
    pub fn append_sale(&self, sale: SaleRecord) {
        let mut sales = self.load_sales();
        sales.push(sale);
        self.write(keys::SALES, &sales);
    }
}
