//! File names for re-encoded images.

use crate::ImageFormat;

/// Name for a file re-encoded as `output`.
///
/// The original name is kept when its extension already belongs to the output
/// format. `.heic`/`.heif` and any other mismatching extension are replaced by
/// the output format's standard one. Names without an extension are kept.
///
/// ```
/// use photobeam_image::{sanitized_file_name, ImageFormat};
///
/// assert_eq!(sanitized_file_name("IMG_0042.HEIC", ImageFormat::Jpeg), "IMG_0042.jpg");
/// assert_eq!(sanitized_file_name("beach.jpeg", ImageFormat::Jpeg), "beach.jpeg");
/// assert_eq!(sanitized_file_name("scan.bmp", ImageFormat::Png), "scan.png");
/// ```
pub fn sanitized_file_name(name: &str, output: ImageFormat) -> String {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return name.to_string();
    };
    if stem.is_empty() || ext.is_empty() {
        return name.to_string();
    }

    let ext = ext.to_ascii_lowercase();
    if output.extensions().contains(&ext.as_str()) {
        name.to_string()
    } else {
        format!("{}.{}", stem, output.preferred_extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heif_variants() {
        assert_eq!(sanitized_file_name("a.heif", ImageFormat::Jpeg), "a.jpg");
        assert_eq!(sanitized_file_name("a.b.HeIc", ImageFormat::Jpeg), "a.b.jpg");
    }

    #[test]
    fn test_no_extension_kept() {
        assert_eq!(sanitized_file_name("photo", ImageFormat::Jpeg), "photo");
        assert_eq!(sanitized_file_name(".hidden", ImageFormat::Png), ".hidden");
        assert_eq!(sanitized_file_name("trailing.", ImageFormat::Png), "trailing.");
    }

    proptest! {
        #[test]
        fn heic_always_becomes_jpg(stem in "[A-Za-z0-9_ -]{1,24}") {
            let renamed = sanitized_file_name(&format!("{}.heic", stem), ImageFormat::Jpeg);
            prop_assert_eq!(renamed, format!("{}.jpg", stem));
        }

        #[test]
        fn matching_extension_is_untouched(
            stem in "[A-Za-z0-9_-]{1,24}",
            ext in prop::sample::select(vec!["jpg", "JPG", "jpeg", "Jpeg", "jfif"]),
        ) {
            let name = format!("{}.{}", stem, ext);
            prop_assert_eq!(sanitized_file_name(&name, ImageFormat::Jpeg), name);
        }
    }
}
