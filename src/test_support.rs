use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that write and run scripts. A fork in another test thread
/// while a script is still open for writing makes exec fail with ETXTBSY.
pub fn lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Stands in for yt-dlp: answers `--version` and `-U`. With
/// `--write-all-thumbnails --skip-download` it writes two slide images from
/// the `thumbnail:` template, named `<name>.<thumbnail id>.jpg`, like a
/// two-image photo post. Otherwise it fills the `-o` template and writes one
/// video. Each run prints the info JSON the way `--print ...:%()j` does.
pub const SUCCEEDING_EXTRACTOR: &str = r#"
case "$1" in
  --version) echo "2024.01.01"; exit 0 ;;
  -U) echo "yt-dlp is up to date (2024.01.01)"; exit 0 ;;
esac
template=""
thumbnails=""
all_thumbnails=0
skip_download=0
while [ $# -gt 0 ]; do
  case "$1" in
    -o)
      case "$2" in
        thumbnail:*) thumbnails="${2#thumbnail:}" ;;
        *) template="$2" ;;
      esac
      shift 2 ;;
    --write-all-thumbnails) all_thumbnails=1; shift ;;
    --skip-download) skip_download=1; shift ;;
    *) shift ;;
  esac
done
fill() {
  printf '%s' "$1" | sed -e 's/%(uploader)s/someuser/' -e 's/%(id)s/7301/' -e "s/%(ext)s/$2/"
}
if [ "$all_thumbnails" = 1 ] && [ "$skip_download" = 1 ] && [ -n "$thumbnails" ]; then
  for n in 0 1; do
    file=$(fill "$thumbnails" "$n.jpg")
    mkdir -p "$(dirname "$file")"
    printf 'slide %s' "$n" > "$file"
  done
  printf '{"id": "7301", "uploader": "someuser", "ext": "m4a"}\n'
  exit 0
fi
file=$(fill "$template" "mp4")
mkdir -p "$(dirname "$file")"
printf 'media' > "$file"
printf '{"id": "7301", "uploader": "someuser", "ext": "mp4", "filepath": "%s"}\n' "$file"
"#;

/// Stands in for yt-dlp refusing a private post.
pub const FAILING_EXTRACTOR: &str = r#"
case "$1" in
  --version) echo "2024.01.01"; exit 0 ;;
esac
echo "WARNING: [TikTok] 7301: Falling back to webpage" >&2
echo "ERROR: [TikTok] 7301: This account is private" >&2
exit 1
"#;

#[cfg(unix)]
pub fn fake_extractor(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("yt-dlp");
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    path
}
