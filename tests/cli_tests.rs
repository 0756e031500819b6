#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use image::{Rgb, RgbImage};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};

    fn cli(prefs: &Path) -> Command {
        let mut cmd = Command::cargo_bin("batch_imaging").unwrap();
        cmd.arg("--preferences")
            .arg(prefs)
            .env_remove("BATCH_IMAGING_WORKERS")
            .env_remove("BATCH_IMAGING_MAX_WIDTH")
            .env("NO_COLOR", "1");
        cmd
    }

    fn png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([10, 200, 10])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_prefs_path_and_defaults_written() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("prefs.json");

        cli(&prefs)
            .args(["prefs", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("prefs.json"));
        assert!(prefs.exists());
    }

    #[test]
    fn test_prefs_set_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("prefs.json");

        cli(&prefs)
            .args(["prefs", "set", "max_width", "640"])
            .assert()
            .success();
        cli(&prefs)
            .args(["prefs", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("max_width = 640"));
    }

    #[test]
    fn test_prefs_unknown_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        cli(&dir.path().join("prefs.json"))
            .args(["prefs", "set", "colour", "red"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown preference key"));
    }

    #[test]
    fn test_icon_command_writes_icons() {
        let dir = tempfile::tempdir().unwrap();
        let a = png(dir.path(), "a.png", 64, 64);
        let b = png(dir.path(), "b.png", 80, 40);
        let out = dir.path().join("icons");

        cli(&dir.path().join("prefs.json"))
            .arg("icon")
            .arg(&a)
            .arg(&b)
            .arg("-o")
            .arg(&out)
            .args(["--sizes", "16,32"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 converted, 0 failed"));

        assert!(out.join("a.ico").exists());
        assert!(out.join("b.ico").exists());
    }

    #[test]
    fn test_icon_command_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let a = png(dir.path(), "a.png", 32, 32);

        cli(&dir.path().join("prefs.json"))
            .arg("icon")
            .arg(&a)
            .arg(dir.path().join("missing.png"))
            .arg("-o")
            .arg(dir.path().join("icons"))
            .assert()
            .code(1)
            .stdout(predicate::str::contains("1 converted, 1 failed"));
    }

    #[test]
    fn test_icon_same_stem_inputs_get_distinct_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let png_src = png(dir.path(), "logo.png", 32, 32);
        let bmp_src = png(dir.path(), "logo.bmp", 48, 48);
        let out = dir.path().join("icons");

        cli(&dir.path().join("prefs.json"))
            .arg("icon")
            .arg(&png_src)
            .arg(&bmp_src)
            .arg("-o")
            .arg(&out)
            .args(["--sizes", "16,32"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 converted, 0 failed"));

        assert!(out.join("logo.ico").exists());
        assert!(out.join("logo.bmp.ico").exists());
    }

    #[test]
    fn test_icon_repeated_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let src = png(dir.path(), "logo.png", 32, 32);
        let out = dir.path().join("icons");

        cli(&dir.path().join("prefs.json"))
            .arg("icon")
            .arg(&src)
            .arg(&src)
            .arg("-o")
            .arg(&out)
            .args(["--sizes", "16"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("1 converted, 1 failed"))
            .stderr(predicate::str::contains("repeated input"));

        let written: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_icon_rejects_oversized_sizes() {
        let dir = tempfile::tempdir().unwrap();
        cli(&dir.path().join("prefs.json"))
            .args(["icon", "a.png", "-o", "out", "--sizes", "16,512"])
            .assert()
            .failure();
    }

    #[test]
    fn test_merge_command_creates_pdf() {
        let dir = tempfile::tempdir().unwrap();
        png(dir.path(), "1.png", 30, 10);
        png(dir.path(), "2.png", 40, 10);
        let out = dir.path().join("out");

        cli(&dir.path().join("prefs.json"))
            .arg("merge")
            .arg(dir.path())
            .arg("-o")
            .arg(&out)
            .args(["--png", "--name", "scans.pdf"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Batch complete: PDF: scans.pdf, 2 PNGs"));

        assert!(out.join("scans.pdf").exists());
        assert!(out.join("1.png").exists());
    }

    #[test]
    fn test_merge_without_outputs_fails() {
        let dir = tempfile::tempdir().unwrap();
        let a = png(dir.path(), "a.png", 10, 10);

        cli(&dir.path().join("prefs.json"))
            .arg("merge")
            .arg(&a)
            .arg("-o")
            .arg(dir.path().join("out"))
            .arg("--no-pdf")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Choose at least one output format"));
    }

    #[test]
    fn test_validate_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = png(dir.path(), "a.png", 10, 10);

        cli(&dir.path().join("prefs.json"))
            .arg("validate")
            .arg(&a)
            .arg(dir.path().join("nope.png"))
            .assert()
            .code(1)
            .stderr(predicate::str::contains("File not found"));
    }

    #[test]
    fn test_scan_lists_images() {
        let dir = tempfile::tempdir().unwrap();
        png(dir.path(), "holiday_1.png", 4, 4);
        png(dir.path(), "work.png", 4, 4);
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        cli(&dir.path().join("prefs.json"))
            .arg("scan")
            .arg(dir.path())
            .args(["--name", "holiday"])
            .assert()
            .success()
            .stdout(predicate::str::contains("holiday_1.png"))
            .stdout(predicate::str::contains("work.png").not());
    }
}
