//! Regex-based scan of IDL text for content policy type declarations.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Extraction, PolicyConstant, PolicyTypesError, PolicyTypesResult};

/// Declaration pattern. Group 1 is the name, group 2 the decimal value.
pub const DECLARATION_PATTERN: &str = r"\s+const\s+nsContentPolicyType\s+(\w+)\s*=\s*([0-9]+)";

/// The compiled declaration pattern, built on first use.
pub fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DECLARATION_PATTERN).expect("valid regex"))
}

/// Collect every non-overlapping declaration in `text`, in document order.
///
/// Anything that does not match the exact keyword/identifier/integer shape
/// is skipped without error.
pub fn extract_constants(text: &str) -> Extraction {
    let constants: Vec<PolicyConstant> = declaration_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some(PolicyConstant::new(name, value))
        })
        .collect();

    tracing::debug!(count = constants.len(), "extracted policy constants");
    Extraction::from(constants)
}

/// Verify that every value parses and that values strictly increase.
///
/// Gaps are allowed: the IDL has retired ordinals that are never reused.
pub fn check_ordinals(constants: &[PolicyConstant]) -> PolicyTypesResult<()> {
    let mut previous: Option<u64> = None;
    for constant in constants {
        let value = constant.ordinal()?;
        if let Some(prev) = previous {
            if value <= prev {
                return Err(PolicyTypesError::OrdinalNotIncreasing {
                    name: constant.name.clone(),
                    previous: prev,
                    value,
                });
            }
        }
        previous = Some(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDL_EXCERPT: &str = r#"
interface nsIContentPolicy : nsISupports
{
  cenum nsContentPolicyType : 8 {
    TYPE_INVALID = 0,
  };

  const nsContentPolicyType TYPE_OTHER = 1;
  const nsContentPolicyType TYPE_SCRIPT = 2;
  // const nsContentPolicyType TYPE_COMMENTED = 3;
  const nsContentPolicyType TYPE_IMAGE=3;
};
"#;

    #[test]
    fn test_extract_in_document_order() {
        let extraction = extract_constants(IDL_EXCERPT);
        let names: Vec<&str> = extraction.names().collect();
        // The commented line still has whitespace before `const`.
        assert_eq!(
            names,
            ["TYPE_OTHER", "TYPE_SCRIPT", "TYPE_COMMENTED", "TYPE_IMAGE"]
        );
        assert_eq!(extraction.constants[1].value, "2");
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract_constants("").is_empty());
        assert!(extract_constants("no declarations here").is_empty());
    }

    #[test]
    fn test_extract_requires_leading_whitespace() {
        assert!(extract_constants("const nsContentPolicyType TYPE_DOCUMENT = 6").is_empty());
        let extraction = extract_constants("  const nsContentPolicyType TYPE_DOCUMENT = 6");
        assert_eq!(extraction.len(), 1);
        assert_eq!(extraction.constants[0], PolicyConstant::new("TYPE_DOCUMENT", "6"));
    }

    #[test]
    fn test_extract_skips_malformed() {
        let text = "
  const nsContentPolicyType TYPE_HEX = 0x10;
  const nsContentPolicyType = 4;
  const nsContentPolicyTypes TYPE_WRONG = 5;
  constnsContentPolicyType TYPE_GLUED = 6;
  const nsContentPolicyType TYPE_NEGATIVE = -7;
  const PRUint32 TYPE_OTHER_KIND = 8;
  const nsContentPolicyType TYPE_OK = 9;
";
        let extraction = extract_constants(text);
        // `0x10` still yields a leading `0` digit, which the pattern accepts.
        let names: Vec<&str> = extraction.names().collect();
        assert_eq!(names, ["TYPE_HEX", "TYPE_OK"]);
        assert_eq!(extraction.constants[0].value, "0");
    }

    #[test]
    fn test_extract_keeps_duplicate_names() {
        let text = "\n const nsContentPolicyType TYPE_A = 1;\n const nsContentPolicyType TYPE_A = 2;";
        assert_eq!(extract_constants(text).len(), 2);
    }

    #[test]
    fn test_regex_is_shared() {
        assert!(std::ptr::eq(declaration_regex(), declaration_regex()));
    }

    #[test]
    fn test_check_ordinals_accepts_gaps() {
        let constants = vec![
            PolicyConstant::new("TYPE_SUBDOCUMENT", "7"),
            PolicyConstant::new("TYPE_PING", "10"),
        ];
        assert!(check_ordinals(&constants).is_ok());
        assert!(check_ordinals(&[]).is_ok());
    }

    #[test]
    fn test_check_ordinals_rejects_repeats() {
        let constants = vec![
            PolicyConstant::new("TYPE_A", "3"),
            PolicyConstant::new("TYPE_B", "3"),
        ];
        match check_ordinals(&constants) {
            Err(PolicyTypesError::OrdinalNotIncreasing {
                name,
                previous,
                value,
            }) => {
                assert_eq!(name, "TYPE_B");
                assert_eq!(previous, 3);
                assert_eq!(value, 3);
            }
            other => panic!("expected OrdinalNotIncreasing, got {other:?}"),
        }
    }

    #[test]
    fn test_check_ordinals_rejects_overflow() {
        let constants = vec![PolicyConstant::new("TYPE_BIG", "184467440737095516160")];
        assert!(matches!(
            check_ordinals(&constants),
            Err(PolicyTypesError::InvalidValue { .. })
        ));
    }
}
