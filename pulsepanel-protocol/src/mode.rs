//! Display mode selector
//!
//! The same mode is referred to by an integer selector on the counting side
//! and by a single character inside rendered frames. Both mappings live here
//! so they cannot drift apart.

/// Which derived quantity of an encoder is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Forward pulses minus backward pulses (may be negative)
    #[default]
    Difference,
    /// Forward pulses only
    ForwardOnly,
    /// Backward pulses only
    BackwardOnly,
}

impl DisplayMode {
    /// All modes in selector order
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Difference,
        DisplayMode::ForwardOnly,
        DisplayMode::BackwardOnly,
    ];

    /// Look up a mode by its integer selector
    pub const fn from_selector(selector: i32) -> Option<Self> {
        match selector {
            0 => Some(DisplayMode::Difference),
            1 => Some(DisplayMode::ForwardOnly),
            2 => Some(DisplayMode::BackwardOnly),
            _ => None,
        }
    }

    /// Integer selector for this mode
    pub const fn selector(self) -> i32 {
        match self {
            DisplayMode::Difference => 0,
            DisplayMode::ForwardOnly => 1,
            DisplayMode::BackwardOnly => 2,
        }
    }

    /// Character written into the frame for this mode
    pub const fn code(self) -> char {
        match self {
            DisplayMode::Difference => 'd',
            DisplayMode::ForwardOnly => 'f',
            DisplayMode::BackwardOnly => 'b',
        }
    }

    /// Look up a mode by its frame character
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(DisplayMode::Difference),
            'f' => Some(DisplayMode::ForwardOnly),
            'b' => Some(DisplayMode::BackwardOnly),
            _ => None,
        }
    }

    /// Frame character for a raw selector
    ///
    /// Unknown selectors render as the backward character.
    pub const fn code_for_selector(selector: i32) -> char {
        match Self::from_selector(selector) {
            Some(mode) => mode.code(),
            None => DisplayMode::BackwardOnly.code(),
        }
    }

    /// Next mode in selector order, wrapping around
    pub const fn next(self) -> Self {
        match self {
            DisplayMode::Difference => DisplayMode::ForwardOnly,
            DisplayMode::ForwardOnly => DisplayMode::BackwardOnly,
            DisplayMode::BackwardOnly => DisplayMode::Difference,
        }
    }
}
