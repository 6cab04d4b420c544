// Core traits and types shared by the solver and the rollout environment

/// A small ordered key-value map attached to environment steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    /// Create an empty Info map.
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert or replace a key with the given value.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: InfoValue) {
        let k = key.into();
        if let Some((_, v)) = self.entries.iter_mut().find(|(kk, _)| kk == &k) {
            *v = value;
        } else {
            self.entries.push((k, value));
        }
    }

    /// Get a reference to a value by key.
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Number of entries.
    pub fn len(&self) -> usize { self.entries.len() }
}

/// Value types carried in step info maps.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Bool(bool),
    Str(String),
}

impl From<bool> for InfoValue { fn from(v: bool) -> Self { InfoValue::Bool(v) } }
impl From<String> for InfoValue { fn from(v: String) -> Self { InfoValue::Str(v) } }

/// A frame returned by `Env::render` or the table renderers.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Textual representation (one grid row per line).
    Text(String),
    /// Raw pixel buffer in row-major RGBA format.
    Pixels {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
}

/// A step result from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<Obs> Step<Obs> {
    pub fn new(observation: Obs, reward: f64, terminated: bool, truncated: bool, info: Info) -> Self {
        Self { observation, reward, terminated, truncated, info }
    }
}

/// Validation and export errors. Raised before solving starts; the solver loop itself never fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
    #[error("Coordinate out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Invalid start cell: {0}")]
    InvalidStart(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("Other error: {0}")]
    Other(String),
}

/// Convenience alias for results using GridError.
pub type Result<T> = std::result::Result<T, GridError>;

/// Episodic environment contract used by the grid-world simulator.
pub trait Env {
    type Obs;
    type Act;

    /// Reset the environment to an initial state.
    /// Implementations should re-seed internal RNGs when `seed` is provided.
    fn reset(&mut self, seed: Option<u64>) -> (Self::Obs, Info);

    /// Apply an action and advance the environment by one step.
    fn step(&mut self, action: Self::Act) -> Step<Self::Obs>;

    /// Render a frame of the current state, if supported.
    fn render(&self) -> Option<RenderFrame> { None }

    /// Close and release any external resources.
    fn close(&mut self) {}
}
