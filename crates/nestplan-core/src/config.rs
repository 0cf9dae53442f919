//! Compiler configuration.

/// Row limit applied to the root node when the request gives none.
pub const DEFAULT_LIMIT: u32 = 100;

/// Maximum nesting depth of association includes.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Settings for one [`PlanCompiler`](crate::PlanCompiler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Root row limit when the request has no positive limit.
    pub default_limit: u32,
    /// Maximum depth of association includes below the root.
    pub max_depth: usize,
    /// Validate order and filter columns against the terminal entity.
    pub strict_columns: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_columns: false,
        }
    }
}

impl CompilerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default root limit.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the maximum include depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enable or disable strict column validation.
    pub fn with_strict_columns(mut self, strict: bool) -> Self {
        self.strict_columns = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.max_depth, 16);
        assert!(!config.strict_columns);
    }

    #[test]
    fn test_builders() {
        let config = CompilerConfig::new()
            .with_default_limit(25)
            .with_max_depth(3)
            .with_strict_columns(true);
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.max_depth, 3);
        assert!(config.strict_columns);
    }
}
