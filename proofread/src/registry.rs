//! Type-format registry: named field checks, compiled once.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Formats that accept any value, including the empty string.
const PASS_THROUGH: &[&str] = &["text", "SKIP"];

/// Pattern formats. Every pattern is anchored on both ends when compiled.
const PATTERNS: &[(&str, &str)] = &[
    (
        "uuid",
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    ),
    ("app_id", r"[0-9a-fA-F]{64}"),
    ("user_id", r"[0-9a-fA-F]{32}"),
    ("os", r"IOS|AND"),
    ("version", r"(?:[0-9]+\.)?(?:[0-9]+\.)?(?:\*|[0-9]+)"),
    ("ad_id_type", r"IDFA|AAID"),
    ("am_type", r"[a-z]{2}"),
    (
        "ip_addr",
        r"(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])",
    ),
    ("ts_sec", r"[0-9]{10}"),
    ("ts_msec", r"[0-9]{13}"),
    ("cc", r"[A-Z]{2}"),
    ("state", r"[A-Z]{2}"),
    ("zip", r"[0-9]{5}"),
    ("loc_context", r"(?:fore|back)ground"),
    ("loc_method", r"BCN|GPS"),
    (
        "exchange",
        r"ASX|BIT|BVMF|CPH|Euronext|FWB|LSE|BMAD|NASDAQ|TSX|NYSE|TYO|SIX|OTC Pink|STO",
    ),
    ("ticker", r".{7}"),
    ("lat", r"[-+]?(?:[1-8]?[0-9](?:\.[0-9]+)?|90(?:\.0+)?)"),
    (
        "lon",
        r"[-+]?(?:180(?:\.0+)?|(?:1[0-7][0-9]|[1-9]?[0-9])(?:\.[0-9]+)?)",
    ),
    ("int", r"[0-9]+"),
    ("float", r"[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?"),
    ("num", r"[0-9]+(?:\.[0-9]+)?"),
];

static BUILTIN: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::prepare);

#[derive(Debug, Clone)]
enum Check {
    Pattern(Regex),
    Any,
}

/// A named field type and the predicate a value must satisfy.
#[derive(Debug, Clone)]
pub struct FormatRule {
    name: &'static str,
    check: Check,
}

impl FormatRule {
    /// The format name as declared in a field format list.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// `true` for formats that accept every value (`text`, `SKIP`).
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        matches!(self.check, Check::Any)
    }

    /// Test a field value against this rule. The whole value must match.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match &self.check {
            Check::Pattern(re) => re.is_match(value),
            Check::Any => true,
        }
    }
}

/// Lookup table from format name to prepared [`FormatRule`].
#[derive(Debug)]
pub struct FormatRegistry {
    rules: BTreeMap<&'static str, FormatRule>,
}

impl FormatRegistry {
    /// The built-in registry, compiled on first use and shared afterwards.
    ///
    /// # Panics
    ///
    /// Panics on first use if a built-in pattern fails to compile, which is a
    /// programming error caught by this module's tests.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    fn prepare() -> Self {
        let mut rules = BTreeMap::new();
        for &(name, pattern) in PATTERNS {
            let re = match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(regex) => regex,
                Err(err) => panic!("Invalid pattern for format '{name}': {err}"),
            };
            rules.insert(
                name,
                FormatRule {
                    name,
                    check: Check::Pattern(re),
                },
            );
        }
        for &name in PASS_THROUGH {
            rules.insert(
                name,
                FormatRule {
                    name,
                    check: Check::Any,
                },
            );
        }
        Self { rules }
    }

    /// Look up a format by name. `None` means the name is not registered.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&FormatRule> {
        self.rules.get(name)
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static FormatRule {
        match FormatRegistry::builtin().resolve(name) {
            Some(rule) => rule,
            None => panic!("format {name} missing from builtin registry"),
        }
    }

    #[test]
    fn test_every_builtin_pattern_compiles() {
        let registry = FormatRegistry::builtin();
        assert_eq!(
            registry.names().count(),
            PATTERNS.len() + PASS_THROUGH.len()
        );
    }

    #[test]
    fn test_unknown_format_does_not_resolve() {
        assert!(FormatRegistry::builtin().resolve("bogus").is_none());
        assert!(FormatRegistry::builtin().resolve("UUID").is_none());
    }

    #[test]
    fn test_uuid() {
        let uuid = rule("uuid");
        assert!(uuid.matches("123e4567-e89b-12d3-a456-426614174000"));
        assert!(uuid.matches("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!uuid.matches("not-a-uuid"));
        assert!(!uuid.matches("x123e4567-e89b-12d3-a456-426614174000"));
        assert!(!uuid.matches(""));
    }

    #[test]
    fn test_patterns_are_anchored() {
        assert!(rule("int").matches("42"));
        assert!(!rule("int").matches("42a"));
        assert!(!rule("int").matches("a42"));
        assert!(!rule("os").matches("IOS7"));
        assert!(!rule("cc").matches("USA"));
    }

    #[test]
    fn test_numeric_shapes() {
        let float = rule("float");
        for ok in ["0", "1.5", "-2.25", "+.5", "3.", "6.02e23"] {
            assert!(float.matches(ok), "float should accept {ok}");
        }
        for bad in ["", ".", "1.2.3", "abc"] {
            assert!(!float.matches(bad), "float should reject {bad}");
        }

        assert!(rule("num").matches("12.5"));
        assert!(!rule("num").matches("-12.5"));
        assert!(rule("ts_sec").matches("1700000000"));
        assert!(!rule("ts_sec").matches("1700000000000"));
        assert!(rule("ts_msec").matches("1700000000000"));
    }

    #[test]
    fn test_lat_lon_ranges() {
        let lat = rule("lat");
        assert!(lat.matches("90"));
        assert!(lat.matches("-89.999"));
        assert!(lat.matches("+45.1"));
        assert!(!lat.matches("90.5"));
        assert!(!lat.matches("91"));

        let lon = rule("lon");
        assert!(lon.matches("-180"));
        assert!(lon.matches("179.9999"));
        assert!(lon.matches("7"));
        assert!(!lon.matches("180.1"));
        assert!(!lon.matches("200"));
    }

    #[test]
    fn test_ip_addr_octets() {
        let ip = rule("ip_addr");
        assert!(ip.matches("10.0.0.1"));
        assert!(ip.matches("255.255.255.255"));
        assert!(!ip.matches("256.1.1.1"));
        assert!(!ip.matches("10.0.0"));
    }

    #[test]
    fn test_enumerations() {
        assert!(rule("loc_context").matches("foreground"));
        assert!(rule("loc_context").matches("background"));
        assert!(!rule("loc_context").matches("ground"));
        assert!(rule("exchange").matches("OTC Pink"));
        assert!(rule("ad_id_type").matches("AAID"));
        assert!(rule("version").matches("1.2.*"));
    }

    #[test]
    fn test_pass_through_formats_accept_anything() {
        for name in PASS_THROUGH {
            let r = rule(name);
            assert!(r.is_pass_through());
            assert!(r.matches(""));
            assert!(r.matches("anything | at all"));
        }
        assert!(!rule("int").is_pass_through());
    }
}
