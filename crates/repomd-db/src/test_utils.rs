use std::path::PathBuf;

use diesel::{connection::SimpleConnection, Connection, SqliteConnection};
use tempfile::TempDir;

const PRIMARY: &str = "
CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT, name TEXT, arch TEXT,
    version TEXT, epoch TEXT, release TEXT, summary TEXT, description TEXT, url TEXT,
    rpm_license TEXT, rpm_group TEXT, size_package INTEGER, location_href TEXT);
CREATE TABLE provides (name TEXT, flags TEXT, epoch TEXT, version TEXT, release TEXT,
    pkgKey INTEGER);
INSERT INTO packages VALUES (1, 'aaa111', 'gnome-power-manager', 'i686', '2.29.91', '0',
    '1.fc13', 'GNOME power management service', 'Power management daemon',
    'http://projects.gnome.org/gnome-power-manager/', 'GPLv2+', 'Applications/System',
    2471824, 'Packages/gnome-power-manager-2.29.91-1.fc13.i686.rpm');
INSERT INTO packages VALUES (2, 'bbb222', 'gnome-packagekit', 'i686', '2.29.3', '0',
    '2.fc13', 'Session applications to manage packages', 'Update viewer',
    'http://www.packagekit.org', 'GPLv2+', 'Applications/System', 1342211,
    'Packages/gnome-packagekit-2.29.3-2.fc13.i686.rpm');
INSERT INTO packages VALUES (3, 'ccc333', 'zsh', 'i686', '4.3.10', '0', '7.fc13',
    'A powerful interactive shell', 'The zsh shell', 'http://zsh.sunsite.dk/', 'BSD',
    'System Environment/Shells', 2100000, 'Packages/zsh-4.3.10-7.fc13.i686.rpm');
INSERT INTO provides VALUES ('gnome-power-manager', 'EQ', '0', '2.29.91', '1.fc13', 1);
INSERT INTO provides VALUES ('/bin/zsh', NULL, NULL, NULL, NULL, 3);
";

const OTHER: &str = "
CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT);
CREATE TABLE changelog (pkgKey INTEGER, author TEXT, date INTEGER, changelog TEXT);
INSERT INTO packages VALUES (1, 'abc123');
INSERT INTO changelog VALUES (1, 'Richard Hughes <rhughes@redhat.com> - 2.29.1-1.fc13',
    1264075200, '- Update to 2.29.1');
INSERT INTO changelog VALUES (1, 'Richard Hughes <rhughes@redhat.com> - 2.29.91-1.fc13',
    1266840000, '- Update to 2.29.91');
";

fn store(schema: &str, file_name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    let mut conn = SqliteConnection::establish(&path.to_string_lossy()).unwrap();
    conn.batch_execute(schema).unwrap();
    (dir, path)
}

pub fn primary_store() -> (TempDir, PathBuf) {
    store(PRIMARY, "primary.sqlite")
}

pub fn other_store() -> (TempDir, PathBuf) {
    store(OTHER, "other.sqlite")
}
