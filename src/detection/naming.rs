use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const FILE_PREFIX: &str = "honey_badger";
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Builds `honey_badger_{YYYYMMDD_HHMMSS}_{token}{ext}` for a stored image.
///
/// The extension is the uploaded filename from its last dot, so a bare
/// `.png` keeps `.png`; a name with no dot or a trailing dot gets `.jpg`. The 8-char hex token keeps names from the same second apart.
pub fn generate_file_name(original: Option<&str>, now: DateTime<Utc>) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}{}",
        FILE_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        &token[..8],
        extension_of(original)
    )
}

fn extension_of(original: Option<&str>) -> String {
    original
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .and_then(|base| base.rfind('.').map(|dot| &base[dot..]))
        .filter(|ext| ext.len() > 1)
        .unwrap_or(DEFAULT_EXTENSION)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap()
    }

    fn assert_shape(name: &str, ext: &str) {
        let rest = name.strip_prefix("honey_badger_").unwrap();
        let rest = rest.strip_suffix(ext).unwrap();
        let (timestamp, token) = rest.rsplit_once('_').unwrap();

        assert_eq!(timestamp.len(), 15);
        assert_eq!(timestamp.replace('_', "").len(), 14);
        assert!(timestamp.replace('_', "").chars().all(|c| c.is_ascii_digit()));
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uses_timestamp_and_original_extension() {
        let name = generate_file_name(Some("trailcam.png"), fixed_time());

        assert!(name.starts_with("honey_badger_20240501_090307_"));
        assert!(name.ends_with(".png"));
        assert_shape(&name, ".png");
    }

    #[test]
    fn defaults_to_jpg() {
        for original in [None, Some(""), Some("snapshot"), Some("snapshot.")] {
            let name = generate_file_name(original, fixed_time());
            assert!(name.ends_with(".jpg"), "{original:?} -> {name}");
            assert_shape(&name, ".jpg");
        }
    }

    #[test]
    fn only_the_last_extension_is_kept() {
        let name = generate_file_name(Some("dir/photo.backup.JPEG"), fixed_time());
        assert!(name.ends_with(".JPEG"));
        assert!(!name.contains("backup"));
    }

    #[test]
    fn dot_leading_name_keeps_its_extension() {
        let name = generate_file_name(Some(".png"), fixed_time());
        assert_shape(&name, ".png");

        let name = generate_file_name(Some("uploads/.webp"), fixed_time());
        assert_shape(&name, ".webp");
    }

    #[test]
    fn dots_in_directories_are_ignored() {
        let name = generate_file_name(Some("dir.v2/photo"), fixed_time());
        assert_shape(&name, ".jpg");
    }

    #[test]
    fn names_in_the_same_second_differ() {
        let now = fixed_time();
        let a = generate_file_name(Some("a.jpg"), now);
        let b = generate_file_name(Some("a.jpg"), now);
        assert_ne!(a, b);
    }
}
