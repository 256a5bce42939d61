// src/assets/class.rs

use std::fmt;

/// A category of source file sharing one transformation pipeline.
///
/// `Html` is a reload-only binding over the dist tree: hand-authored pages
/// trigger a browser refresh but no transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Styles,
    Images,
    Scripts,
    Vendor,
    Html,
}

impl AssetClass {
    /// Transform classes in initial build order. Clean runs before these;
    /// the order keeps writers out of each other's destination directories
    /// and makes notification ordering reproducible.
    pub const TRANSFORMS: [AssetClass; 4] = [
        AssetClass::Images,
        AssetClass::Styles,
        AssetClass::Scripts,
        AssetClass::Vendor,
    ];

    /// Every class that can be bound to the watcher.
    pub const BINDINGS: [AssetClass; 5] = [
        AssetClass::Images,
        AssetClass::Styles,
        AssetClass::Scripts,
        AssetClass::Vendor,
        AssetClass::Html,
    ];

    /// Stable lowercase name, used for logging and the hash store.
    pub fn name(&self) -> &'static str {
        match self {
            AssetClass::Styles => "styles",
            AssetClass::Images => "images",
            AssetClass::Scripts => "scripts",
            AssetClass::Vendor => "vendor",
            AssetClass::Html => "html",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
