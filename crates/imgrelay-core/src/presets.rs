//! Named presets: server-configured bundles of processing options.
//!
//! A preset is written as `name=option/option/...` where every option uses the
//! same `name:arg:arg` syntax as the processing URL itself.

/// One `name:arg1:arg2` token from a processing URL or a preset definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOption {
    pub name: String,
    pub args: Vec<String>,
}

impl UrlOption {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Split a path segment on `:`. Returns `None` when the segment has no colon,
    /// i.e. when it is not an option token at all.
    pub fn parse(segment: &str) -> Option<Self> {
        let mut parts = segment.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<String> = parts.map(str::to_string).collect();

        if args.is_empty() {
            return None;
        }

        Some(Self::new(name, args))
    }
}

pub type UrlOptions = Vec<UrlOption>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("Invalid preset string: {0}")]
    InvalidString(String),

    #[error("Empty preset name: {0}")]
    EmptyName(String),

    #[error("Empty preset value: {0}")]
    EmptyValue(String),

    #[error("Invalid preset value: {0}")]
    InvalidValue(String),
}

/// Presets table, kept in definition order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presets {
    entries: Vec<(String, UrlOptions)>,
}

impl Presets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` entries. Redefining a name replaces the earlier definition.
    pub fn parse<I, S>(entries: I) -> Result<Self, PresetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut presets = Presets::new();

        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let (name, value) = parse_preset(entry)?;
            presets.insert(name, value);
        }

        Ok(presets)
    }

    pub fn insert(&mut self, name: impl Into<String>, options: UrlOptions) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = options,
            None => self.entries.push((name, options)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UrlOptions> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, options)| options)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UrlOptions)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }
}

fn parse_preset(entry: &str) -> Result<(String, UrlOptions), PresetError> {
    let (name, value) = entry
        .split_once('=')
        .ok_or_else(|| PresetError::InvalidString(entry.to_string()))?;

    let name = name.trim();
    let value = value.trim();

    if name.is_empty() {
        return Err(PresetError::EmptyName(entry.to_string()));
    }
    if value.is_empty() {
        return Err(PresetError::EmptyValue(entry.to_string()));
    }

    let options = value
        .trim_matches('/')
        .split('/')
        .map(|part| UrlOption::parse(part).ok_or_else(|| PresetError::InvalidValue(entry.to_string())))
        .collect::<Result<UrlOptions, _>>()?;

    Ok((name.to_string(), options))
}
