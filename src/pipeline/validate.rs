//! Client-side validation of a selected file against the active mode.
//!
//! Pure functions with no side effects: a rejected file leaves all session
//! state untouched, and switching modes never revalidates a file that was
//! already accepted.

use crate::config::ConversionMode;
use crate::error::ConvertError;
use crate::pipeline::input::SelectedFile;

/// Check `file` against `mode` and the upload size cap.
///
/// The type rule accepts the file when the sniffed MIME type matches the
/// mode's expected type **or** the filename extension matches
/// case-insensitively; either condition suffices. The type rule runs first,
/// so a wrong-type file is rejected as such regardless of its size.
pub fn validate(
    file: &SelectedFile,
    mode: ConversionMode,
    max_bytes: u64,
) -> Result<(), ConvertError> {
    let mime_matches = file.mime == Some(mode.input_mime());
    let ext_matches = file.extension().as_deref() == Some(mode.input_extension());

    if !mime_matches && !ext_matches {
        return Err(ConvertError::WrongType {
            name: file.name.clone(),
            expected: mode.input_label(),
            mode,
        });
    }

    if file.size > max_bytes {
        return Err(ConvertError::TooLarge {
            size: file.size,
            limit: max_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_UPLOAD_BYTES;
    use crate::error::ErrorCategory;
    use bytes::Bytes;

    fn png_file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, &b"\x89PNG\r\n\x1a\npayload"[..])
    }

    fn file_with_size(name: &str, content_prefix: &[u8], size: usize) -> SelectedFile {
        let mut data = content_prefix.to_vec();
        data.resize(size, 0);
        SelectedFile::from_bytes(name, Bytes::from(data))
    }

    #[test]
    fn accepts_matching_mime_and_extension() {
        assert!(validate(&png_file("photo.png"), ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn mime_alone_suffices() {
        // PNG content under a neutral name: MIME matches, extension does not.
        let f = SelectedFile::from_bytes("export.data", &b"\x89PNG\r\n\x1a\n"[..]);
        assert!(validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn extension_alone_suffices() {
        // Plain-text content renamed to .pdf: extension matches, MIME does not.
        let f = SelectedFile::from_bytes("doc.pdf", &b"just some text"[..]);
        assert!(validate(&f, ConversionMode::PdfToPng, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let f = SelectedFile::from_bytes("SCAN.PNG", &b"not a real png"[..]);
        assert!(validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_wrong_type_for_active_mode() {
        let f = png_file("photo.png");
        let err = validate(&f, ConversionMode::PdfToPng, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, ConvertError::WrongType { .. }));
        assert_eq!(err.category(), ErrorCategory::InvalidFormat);
    }

    #[test]
    fn wrong_type_wins_over_size() {
        // Oversized AND wrong type: the type rejection is reported.
        let f = file_with_size("huge.txt", b"text", (MAX_UPLOAD_BYTES + 1) as usize);
        let err = validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, ConvertError::WrongType { .. }));
    }

    #[test]
    fn rejects_oversize_file_of_correct_type() {
        let f = file_with_size(
            "big.png",
            b"\x89PNG\r\n\x1a\n",
            (MAX_UPLOAD_BYTES + 1) as usize,
        );
        let err = validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, ConvertError::TooLarge { .. }));
        assert_eq!(err.category(), ErrorCategory::FileTooLarge);
    }

    #[test]
    fn exactly_at_the_cap_passes() {
        let f = file_with_size(
            "edge.png",
            b"\x89PNG\r\n\x1a\n",
            MAX_UPLOAD_BYTES as usize,
        );
        assert!(validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn mode_switch_does_not_revalidate_prior_acceptance() {
        // Validation is a pure function of (file, mode): accepting a file
        // under one mode and then switching modes only affects the next call.
        let f = png_file("photo.png");
        assert!(validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());

        let under_new_mode = validate(&f, ConversionMode::PdfToPng, MAX_UPLOAD_BYTES);
        assert!(under_new_mode.is_err());

        // The original acceptance is unaffected by the later call.
        assert!(validate(&f, ConversionMode::PngToPdf, MAX_UPLOAD_BYTES).is_ok());
    }
}
