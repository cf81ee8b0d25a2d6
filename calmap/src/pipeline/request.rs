use serde::Deserialize;

use calmap_core::{CalmapError, CollapseFunc, CollapsePeriod, ColumnSelector};

/// Trailing moving-average window, in observations. Always at least 1.
///
/// A requested size of 1 or less, zero and negatives included, becomes the
/// one-observation window, which leaves the series unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "WindowRepr")]
pub struct RollingWindow(usize);

impl RollingWindow {
    /// Build a window of `n` observations; zero gives a window of one.
    #[must_use]
    pub const fn new(n: usize) -> Self {
        if n == 0 { Self(1) } else { Self(n) }
    }

    /// Window length.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WindowRepr {
    Int(i64),
    Text(String),
}

impl TryFrom<WindowRepr> for RollingWindow {
    type Error = String;

    fn try_from(raw: WindowRepr) -> Result<Self, Self::Error> {
        let n = match raw {
            WindowRepr::Int(n) => n,
            WindowRepr::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("RollingAve '{s}' is not an integer"))?,
        };
        if n <= 1 {
            return Ok(Self(1));
        }
        usize::try_from(n)
            .map(Self)
            .map_err(|_| format!("RollingAve {n} is too large"))
    }
}

/// A validated remap request.
///
/// JSON shape:
/// ```json
/// {
///   "symbol": "LBMA/GOLD",
///   "column": "USD (AM)",
///   "dates": ["2020-01", "2020-02"],
///   "collapse": "monthly",
///   "collapse_func": "max",
///   "RollingAve": 3
/// }
/// ```
/// `collapse`, `collapse_func` (default `mean`) and `RollingAve` are optional;
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemapRequest {
    /// Dataset identifier passed to the provider.
    pub symbol: String,
    /// `"ALL"` or one field name.
    pub column: ColumnSelector,
    /// Raw requested dates, order and duplicates preserved.
    pub dates: Vec<String>,
    /// Optional period aggregation.
    #[serde(default)]
    pub collapse: Option<CollapsePeriod>,
    /// Aggregation used by `collapse`; validated even when `collapse` is absent.
    #[serde(default)]
    pub collapse_func: CollapseFunc,
    /// Optional trailing moving-average window.
    #[serde(default, rename = "RollingAve")]
    pub rolling: Option<RollingWindow>,
}

impl RemapRequest {
    /// Request for `symbol`/`column` on `dates` with no collapse or averaging.
    pub fn new<S: Into<String>>(
        symbol: impl Into<String>,
        column: impl Into<ColumnSelector>,
        dates: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            column: column.into(),
            dates: dates.into_iter().map(Into::into).collect(),
            collapse: None,
            collapse_func: CollapseFunc::default(),
            rolling: None,
        }
    }

    /// Collapse into `period` buckets using `func`.
    #[must_use]
    pub const fn with_collapse(mut self, period: CollapsePeriod, func: CollapseFunc) -> Self {
        self.collapse = Some(period);
        self.collapse_func = func;
        self
    }

    /// Apply a trailing moving average of `window` observations.
    #[must_use]
    pub const fn with_rolling(mut self, window: RollingWindow) -> Self {
        self.rolling = Some(window);
        self
    }

    /// Parse and validate a JSON body.
    ///
    /// # Errors
    /// Returns `Validation` for a non-JSON body, missing or mistyped fields,
    /// unsupported option values, or a failed [`validate`](Self::validate).
    pub fn from_json(body: &str) -> Result<Self, CalmapError> {
        let req: Self = serde_json::from_str(body)?;
        req.validate()?;
        Ok(req)
    }

    /// Check the invariants serde cannot express.
    ///
    /// # Errors
    /// Returns `Validation` when the symbol is blank or `dates` is empty.
    pub fn validate(&self) -> Result<(), CalmapError> {
        if self.symbol.trim().is_empty() {
            return Err(CalmapError::validation("symbol must be a non-empty string"));
        }
        if self.dates.is_empty() {
            return Err(CalmapError::validation("dates must be a non-empty list"));
        }
        Ok(())
    }
}
