//! Rendering of artifacts to YAML files.
//!
//! One file per resource kind, `<prefix>_<kind>.yaml`. Several artifacts of
//! the same kind share a file as separate documents. Everything is rendered
//! and staged before the first file is put in place. When putting a file in
//! place fails, the files already placed are taken back and any files they
//! replaced are restored, so a failed run leaves no partial set behind.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use resources::objects::ResourceKind;

use crate::{
    context::Artifact,
    error::{Error, Result},
};

pub fn file_name(prefix: &str, kind: ResourceKind) -> String {
    format!("{}_{}.yaml", prefix, kind)
}

fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("yaml.tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("yaml.bak")
}

fn remove_staged(staged: &[(PathBuf, PathBuf)]) {
    for (staging, _) in staged {
        if let Err(e) = fs::remove_file(staging) {
            tracing::warn!("Failed to remove staged file {}: {}", staging.display(), e);
        }
    }
}

/// Moves a staged file to its final path. A file already there is kept
/// aside and its backup path returned.
fn place(staging: &Path, path: &Path) -> Result<Option<PathBuf>> {
    let backup = if path.is_file() {
        let backup = backup_path(path);
        fs::rename(path, &backup).map_err(|e| Error::io(path, e))?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(staging, path) {
        if let Some(backup) = &backup {
            restore(path, backup);
        }
        return Err(Error::io(path, e));
    }
    Ok(backup)
}

fn restore(path: &Path, backup: &Path) {
    if let Err(e) = fs::rename(backup, path) {
        tracing::warn!("Failed to restore {} from {}: {}", path.display(), backup.display(), e);
    }
}

/// Takes back placed files, newest first.
fn unplace(placed: &[(PathBuf, Option<PathBuf>)]) {
    for (path, backup) in placed.iter().rev() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
        if let Some(backup) = backup {
            restore(path, backup);
        }
    }
}

/// Writes the artifacts into `dir` and returns the written paths in kind order.
pub fn write_artifacts(dir: &Path, prefix: &str, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    let mut documents = BTreeMap::<ResourceKind, String>::new();
    for artifact in artifacts {
        let rendered = artifact.render()?;
        let document = documents.entry(artifact.kind).or_default();
        if !document.is_empty() && !rendered.starts_with("---") {
            document.push_str("---\n");
        }
        document.push_str(&rendered);
    }

    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut staged = Vec::with_capacity(documents.len());
    for (kind, document) in &documents {
        let path = dir.join(file_name(prefix, *kind));
        let staging = staging_path(&path);
        if let Err(e) = fs::write(&staging, document) {
            remove_staged(&staged);
            return Err(Error::io(staging, e));
        }
        staged.push((staging, path));
    }

    let mut placed = Vec::with_capacity(staged.len());
    for (i, (staging, path)) in staged.iter().enumerate() {
        match place(staging, path) {
            Ok(backup) => placed.push((path.clone(), backup)),
            Err(e) => {
                remove_staged(&staged[i..]);
                unplace(&placed);
                return Err(e);
            },
        }
    }

    let mut written = Vec::with_capacity(placed.len());
    for (path, backup) in placed {
        if let Some(backup) = backup {
            if let Err(e) = fs::remove_file(&backup) {
                tracing::warn!("Failed to remove backup {}: {}", backup.display(), e);
            }
        }
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use resources::{
        models::image::ImageDescriptor,
        objects::{config_map::ConfigMap, KubeObject, Metadata},
    };

    use tempfile::tempdir;

    use super::*;

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak"))
            .collect()
    }

    fn config_map(name: &str) -> Artifact {
        Artifact::manifest(KubeObject::ConfigMap(ConfigMap::new(Metadata::new(name, None))))
    }

    fn image() -> Artifact {
        Artifact::image(ImageDescriptor {
            name: "hello".to_string(),
            registry: None,
            tag: "latest".to_string(),
            base_image: None,
            ports: Default::default(),
            push: false,
            build_image: true,
            username: None,
            password: None,
            docker_config_path: None,
            docker_host: None,
            docker_cert_path: None,
            cmd: None,
            command_args: vec![],
            enable_debug: false,
            service: true,
        })
    }

    #[test]
    fn one_file_per_kind() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let written = write_artifacts(
            &dir,
            "hello",
            &[image(), config_map("a"), config_map("b")],
        )
        .unwrap();

        assert_eq!(
            written,
            vec![dir.join("hello_config_map.yaml"), dir.join("hello_image.yaml")]
        );
        let config_maps = fs::read_to_string(dir.join("hello_config_map.yaml")).unwrap();
        assert!(config_maps.contains("name: a"));
        assert!(config_maps.contains("name: b"));
        assert_eq!(config_maps.matches("kind: ConfigMap").count(), 2);
        assert!(config_maps.contains("---"));

        assert!(leftovers(dir).is_empty());
    }

    #[test]
    fn rewrite_replaces_previous_files() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("hello_config_map.yaml"), "old").unwrap();

        write_artifacts(dir, "hello", &[config_map("fresh")]).unwrap();

        let config_maps = fs::read_to_string(dir.join("hello_config_map.yaml")).unwrap();
        assert!(config_maps.contains("name: fresh"));
        assert!(leftovers(dir).is_empty());
    }

    #[test]
    fn failed_placement_takes_back_placed_files() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("hello_config_map.yaml"), "old").unwrap();
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir(dir.join("hello_image.yaml")).unwrap();
        fs::write(dir.join("hello_image.yaml").join("keep"), "").unwrap();

        let err = write_artifacts(dir, "hello", &[config_map("fresh"), image()]).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(
            fs::read_to_string(dir.join("hello_config_map.yaml")).unwrap(),
            "old"
        );
        assert!(dir.join("hello_image.yaml").is_dir());
        assert!(leftovers(dir).is_empty());
    }

    #[test]
    fn failed_placement_leaves_no_new_file() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::create_dir(dir.join("hello_image.yaml")).unwrap();
        fs::write(dir.join("hello_image.yaml").join("keep"), "").unwrap();

        let err = write_artifacts(dir, "hello", &[config_map("fresh"), image()]).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(!dir.join("hello_config_map.yaml").exists());
        assert!(leftovers(dir).is_empty());
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let tmp = tempdir().unwrap();
        let blocked = tmp.path().join("blocked");
        fs::write(&blocked, "not a directory").unwrap();

        let err = write_artifacts(&blocked.join("out"), "hello", &[config_map("a")]).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name("hello", ResourceKind::VolumeClaim), "hello_volume_claim.yaml");
        assert_eq!(file_name("hello", ResourceKind::CronJob), "hello_cronjob.yaml");
    }
}
