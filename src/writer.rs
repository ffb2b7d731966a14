use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use filetime::FileTime;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::date::{self, DatePriority};
use crate::media::MediaFile;
use crate::naming;
use crate::{ImportOptions, ImportReport, NamingMode, Operation, SubfolderMode};

/// Earliest and latest resolvable dates across the batch. Files with no
/// date are skipped here; the transfer pass treats them as fatal.
fn date_range(files: &[MediaFile], priority: DatePriority) -> Option<(NaiveDate, NaiveDate)> {
    let mut range: Option<(NaiveDate, NaiveDate)> = None;
    for file in files {
        if let Some(r) = date::resolve(&file.path, priority) {
            range = Some(match range {
                Some((earliest, latest)) => (earliest.min(r.date), latest.max(r.date)),
                None => (r.date, r.date),
            });
        }
    }
    range
}

/// Transfer the batch: derive the folder name from the date range, copy or
/// move each file into its per-day subfolder, then apply the content suffix
/// and the manifest log. Dates are resolved again per file during the
/// transfer; the planning pass is not carried over.
pub fn execute(options: &ImportOptions, files: &[MediaFile]) -> Result<ImportReport> {
    let Some((earliest, latest)) = date_range(files, options.date_priority) else {
        bail!(
            "no date could be determined for any file under {}",
            options.source.display()
        );
    };

    let naming = options.naming.unwrap_or(if earliest == latest {
        NamingMode::SingleDate
    } else {
        NamingMode::DateRange
    });
    let subfolders = options.subfolders.unwrap_or(if earliest == latest {
        SubfolderMode::SingleFolder
    } else {
        SubfolderMode::PerDay
    });

    let folder_name = naming::main_folder_name(earliest, latest, &options.label, naming);
    let dest_folder = options.dest.join(&folder_name);
    fs::create_dir_all(&dest_folder)
        .with_context(|| format!("creating {}", dest_folder.display()))?;
    info!("batch folder: {}", dest_folder.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {msg}")
            .unwrap(),
    );
    pb.set_message(match options.operation {
        Operation::Copy => "copying files",
        Operation::Move => "moving files",
    });

    let mut transferred: Vec<PathBuf> = Vec::with_capacity(files.len());
    let mut total_bytes = 0u64;

    for file in files {
        let Some(resolved) = date::resolve(&file.path, options.date_priority) else {
            pb.finish_and_clear();
            bail!("cannot determine a date for {}", file.filename);
        };

        let day_dir = dest_folder.join(resolved.date.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&day_dir).with_context(|| format!("creating {}", day_dir.display()))?;

        let dest = day_dir.join(&file.filename);
        match options.operation {
            Operation::Copy => copy_file(&file.path, &dest)?,
            Operation::Move => move_file(&file.path, &dest)?,
        }

        debug!("{} -> {}", file.path.display(), dest.display());
        total_bytes += file.size;
        transferred.push(dest);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let final_folder = if options.suffix {
        naming::apply_suffix(&dest_folder)?
    } else {
        dest_folder
    };

    let log_path = if options.write_log {
        Some(write_manifest(
            options,
            naming,
            subfolders,
            &final_folder,
            &transferred,
        )?)
    } else {
        None
    };

    info!(
        "transferred {} files ({} bytes) into {}",
        transferred.len(),
        total_bytes,
        final_folder.display()
    );

    Ok(ImportReport {
        files: transferred,
        total_bytes,
        dest_folder: final_folder,
        log_path,
    })
}

/// Copy preserving the source modification time.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)
        .with_context(|| format!("copying {} -> {}", src.display(), dest.display()))?;

    let meta = fs::metadata(src)
        .with_context(|| format!("reading metadata of {}", src.display()))?;
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_mtime(dest, mtime).ok();
    Ok(())
}

/// Rename when possible; falls back to copy-and-delete across filesystems.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    copy_file(src, dest)?;
    fs::remove_file(src).with_context(|| format!("removing {}", src.display()))
}

/// Write the transfer manifest into the finished batch folder. The file
/// list records destination paths as they were written, before any suffix
/// rename.
fn write_manifest(
    options: &ImportOptions,
    naming: NamingMode,
    subfolders: SubfolderMode,
    dest_folder: &Path,
    transferred: &[PathBuf],
) -> Result<PathBuf> {
    let folder_name = dest_folder
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let log_path = dest_folder.join(format!("LOG-kopiowania do katalogu {folder_name}.txt"));

    let mut log = fs::File::create(&log_path)
        .with_context(|| format!("creating {}", log_path.display()))?;
    writeln!(log, "Operation: {}", options.operation)?;
    writeln!(log, "Buffer size: {}", options.buffer)?;
    writeln!(log, "Folder name format: {naming}")?;
    writeln!(log, "Append suffix: {}", options.suffix)?;
    writeln!(log, "Subfolders: {subfolders}")?;
    writeln!(log)?;
    writeln!(log, "Transferred files:")?;
    for path in transferred {
        writeln!(log, "{}", path.display())?;
    }

    info!("manifest written: {}", log_path.display());
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferSize;
    use std::fs;

    fn options(source: &Path, dest: &Path) -> ImportOptions {
        ImportOptions {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            label: "Test Camera (TC)".to_string(),
            operation: Operation::Copy,
            date_priority: DatePriority::FilenameOnly,
            naming: None,
            subfolders: None,
            suffix: false,
            write_log: false,
            buffer: BufferSize::Dynamic,
        }
    }

    fn seed(source: &Path) -> Vec<MediaFile> {
        fs::write(source.join("2024-05-10_a.jpg"), b"aaaa").unwrap();
        fs::write(source.join("2024-05-12_b.mp4"), b"bbbbbb").unwrap();
        crate::scan::scan_source(source).files
    }

    #[test]
    fn test_copy_builds_per_day_layout() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let dest = dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        let files = seed(&source);

        let report = execute(&options(&source, &dest), &files).unwrap();

        let batch = dest.join("2024-05-10_do_2024-05-12_TC");
        assert_eq!(report.dest_folder, batch);
        assert_eq!(report.total_bytes, 10);
        assert!(batch.join("2024-05-10").join("2024-05-10_a.jpg").exists());
        assert!(batch.join("2024-05-12").join("2024-05-12_b.mp4").exists());
        // copy leaves the source in place
        assert!(source.join("2024-05-10_a.jpg").exists());
    }

    #[test]
    fn test_move_empties_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let dest = dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        let files = seed(&source);

        let mut opts = options(&source, &dest);
        opts.operation = Operation::Move;
        execute(&opts, &files).unwrap();

        assert!(!source.join("2024-05-10_a.jpg").exists());
        assert!(!source.join("2024-05-12_b.mp4").exists());
    }

    #[test]
    fn test_single_date_batch_gets_single_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let dest = dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(source.join("2024-05-10_a.jpg"), b"a").unwrap();
        let files = crate::scan::scan_source(&source).files;

        let report = execute(&options(&source, &dest), &files).unwrap();
        assert_eq!(report.dest_folder, dest.join("2024-05-10_TC"));
    }

    #[test]
    fn test_suffix_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let dest = dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        let files = seed(&source);

        let mut opts = options(&source, &dest);
        opts.suffix = true;
        opts.write_log = true;
        let report = execute(&opts, &files).unwrap();

        let batch = dest.join("2024-05-10_do_2024-05-12_TC_PM");
        assert_eq!(report.dest_folder, batch);

        let log_path = report.log_path.unwrap();
        assert_eq!(
            log_path,
            batch.join("LOG-kopiowania do katalogu 2024-05-10_do_2024-05-12_TC_PM.txt")
        );
        let log = fs::read_to_string(log_path).unwrap();
        assert!(log.contains("Operation: copy"));
        assert!(log.contains("Folder name format: date range and source"));
        assert!(log.contains("2024-05-10_a.jpg"));
    }

    #[test]
    fn test_undatable_file_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let dest = dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();

        fs::write(source.join("2024-05-10_a.jpg"), b"a").unwrap();
        let mut files = crate::scan::scan_source(&source).files;
        // resolves through no method: EXIF/filename fail and the file has
        // no filesystem metadata
        files.push(MediaFile::new(source.join("phantom.bin"), 0));

        let err = execute(&options(&source, &dest), &files).unwrap_err();
        assert!(err.to_string().contains("phantom.bin"));

        // the file transferred before the failure stays in place
        assert!(dest
            .join("2024-05-10_TC")
            .join("2024-05-10")
            .join("2024-05-10_a.jpg")
            .exists());
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("2024-05-10_a.jpg");
        let dest = dir.path().join("copy.jpg");
        fs::write(&src, b"a").unwrap();

        let past = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src, past).unwrap();

        copy_file(&src, &dest).unwrap();
        let meta = fs::metadata(&dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), past);
    }
}
