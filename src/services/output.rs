use std::path::{Path, PathBuf};

/// File name used when dithering is disabled
pub const UNDITHERED_NAME: &str = "output";

/// Directory that receives the result for `input`.
///
/// An absolute `output` is used as-is. A relative one is placed next to the
/// input's directory, i.e. `<parent of input dir>/<output>`, with relative
/// inputs resolved against `cwd`.
pub fn resolve_output_dir(cwd: &Path, input: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        return output.to_path_buf();
    }

    let input_dir = match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let input_dir = if input_dir.is_absolute() {
        input_dir.to_path_buf()
    } else {
        cwd.join(input_dir)
    };

    let base = input_dir.parent().unwrap_or(&input_dir);
    base.join(output)
}

/// Result file name.
///
/// `output.<ext>` without dithering and `<kernel>.<ext>` with it. When a
/// batch holds several inputs, the input stem is prefixed so results that
/// share a directory do not overwrite each other.
pub fn output_file_name(input: &Path, kernel: Option<&str>, ext: &str, prefix_stem: bool) -> String {
    let name = kernel.unwrap_or(UNDITHERED_NAME);
    if !prefix_stem {
        return format!("{name}.{ext}");
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}-{name}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_output_used_as_is() {
        let dir = resolve_output_dir(
            Path::new("/work"),
            Path::new("photos/cat.jpg"),
            Path::new("/tmp/out"),
        );
        assert_eq!(dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_relative_output_next_to_input_dir() {
        let dir = resolve_output_dir(
            Path::new("/work"),
            Path::new("photos/cat.jpg"),
            Path::new("output"),
        );
        assert_eq!(dir, PathBuf::from("/work/output"));

        let dir = resolve_output_dir(
            Path::new("/work"),
            Path::new("/data/photos/cat.jpg"),
            Path::new("results"),
        );
        assert_eq!(dir, PathBuf::from("/data/results"));
    }

    #[test]
    fn test_bare_file_name_goes_above_cwd() {
        let dir = resolve_output_dir(Path::new("/work/photos"), Path::new("cat.jpg"), Path::new("output"));
        assert_eq!(dir, PathBuf::from("/work/output"));
    }

    #[test]
    fn test_file_names() {
        let input = Path::new("photos/cat.jpg");
        assert_eq!(output_file_name(input, None, "png", false), "output.png");
        assert_eq!(
            output_file_name(input, Some("Sierra-Lite"), "jpg", false),
            "Sierra-Lite.jpg"
        );
        assert_eq!(
            output_file_name(input, Some("Atkinson"), "png", true),
            "cat-Atkinson.png"
        );
        assert_eq!(output_file_name(input, None, "jpg", true), "cat-output.jpg");
    }
}
