//! JSON rendering.

use anyhow::{Context, Result};

use crate::core::profile::PlatformProfile;

/// Render the profile as pretty-printed JSON with a trailing newline.
pub fn render(profile: &PlatformProfile) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(profile).context("failed to serialize profile")?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{resolve, Declarations};
    use crate::test_support::darwin_arm64;

    #[test]
    fn test_json_structure() {
        let profile = resolve(&darwin_arm64(), &Declarations::builtin()).unwrap();
        let json = render(&profile).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["schema_version"], "1.0.0");
        assert_eq!(value["host"]["arch"], "ARM_64");
        assert_eq!(value["capabilities"]["SIZEOF_LONG"], 8);
        assert_eq!(value["capabilities"]["WITH_ICU"], false);
        assert_eq!(value["choices"]["CHARSET"]["backend"], "STDLIBC_ICONV");
        assert_eq!(value["choices"]["CHARSET"]["origin"], "available");
        assert_eq!(value["aliases"][0]["name"], "uchar");
        assert_eq!(value["fingerprint"], profile.fingerprint());
        assert!(value["capabilities"].get("SIZEOF_OFF_T").is_none());
        assert!(json.ends_with("}\n"));
    }
}
