use std::path::PathBuf;

use diesel::{connection::SimpleConnection, Connection, SqliteConnection};
use tempfile::TempDir;

use crate::source::MdInfo;
use repomd_config::source::MdKind;

pub const GPM_PKGID: &str = "7ecdc096c65f9a508835e580bd2a8c9ec74e58c5e695695d8ee8b5e4f938974a";
pub const GPK_DEBUGINFO_PKGID: &str =
    "fe724a76369f74672d697d42d01c98d96679243be5677519511e6d4209119699";
pub const ZSH_PKGID: &str = "a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e";

pub const PRIMARY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="3">
<package type="rpm">
  <name>gnome-power-manager</name>
  <arch>i686</arch>
  <version epoch="0" ver="2.29.91" rel="1.fc13"/>
  <checksum type="sha256" pkgid="YES">7ecdc096c65f9a508835e580bd2a8c9ec74e58c5e695695d8ee8b5e4f938974a</checksum>
  <summary>GNOME power management service</summary>
  <description>GNOME Power Manager uses the information and facilities provided by HAL.</description>
  <packager>Fedora Project</packager>
  <url>http://projects.gnome.org/gnome-power-manager/</url>
  <time file="1266840000" build="1266830000"/>
  <size package="2471824" installed="9300000" archive="9400000"/>
  <location href="Packages/gnome-power-manager-2.29.91-1.fc13.i686.rpm"/>
  <format>
    <rpm:license>GPLv2+ and GFDL</rpm:license>
    <rpm:vendor>Fedora Project</rpm:vendor>
    <rpm:group>Applications/System</rpm:group>
    <rpm:buildhost>x86-03.phx2.fedoraproject.org</rpm:buildhost>
    <rpm:sourcerpm>gnome-power-manager-2.29.91-1.fc13.src.rpm</rpm:sourcerpm>
    <rpm:header-range start="1384" end="43392"/>
    <rpm:provides>
      <rpm:entry name="gnome-power-manager" flags="EQ" epoch="0" ver="2.29.91" rel="1.fc13"/>
      <rpm:entry name="config(gnome-power-manager)" flags="EQ" epoch="0" ver="2.29.91" rel="1.fc13"/>
    </rpm:provides>
    <rpm:requires>
      <rpm:entry name="dbus"/>
      <rpm:entry name="upower" flags="GE" epoch="0" ver="0.9.0"/>
    </rpm:requires>
    <rpm:obsoletes>
      <rpm:entry name="gnome-power-manager-extra" flags="LT" epoch="0" ver="2.29.0"/>
    </rpm:obsoletes>
    <file>/usr/bin/gnome-power-manager</file>
  </format>
</package>
<package type="rpm">
  <name>gnome-packagekit</name>
  <arch>i686</arch>
  <version epoch="0" ver="2.29.3" rel="2.fc13"/>
  <checksum type="sha256" pkgid="YES">53ae8bde9c68a3894e7ee13a7d6c1b7a4b5e8e9662767372e0c8413e903b98ce</checksum>
  <summary>Session applications to manage packages</summary>
  <description>Applications to install and update software, including a power-aware update viewer.</description>
  <url>http://www.packagekit.org</url>
  <size package="1342211"/>
  <location href="Packages/gnome-packagekit-2.29.3-2.fc13.i686.rpm"/>
  <format>
    <rpm:license>GPLv2+</rpm:license>
    <rpm:group>Applications/System</rpm:group>
  </format>
</package>
<package type="rpm">
  <name>zsh</name>
  <arch>i686</arch>
  <version epoch="1" ver="4.3.10" rel="7.fc13"/>
  <checksum type="sha256" pkgid="YES">a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e</checksum>
  <summary>A powerful interactive shell</summary>
  <description>The zsh shell is a command interpreter usable as an interactive login shell.</description>
  <url>http://zsh.sunsite.dk/</url>
  <size package="unknown"/>
  <location href="Packages/zsh-4.3.10-7.fc13.i686.rpm"/>
  <format>
    <rpm:license>BSD</rpm:license>
    <rpm:group>System Environment/Shells</rpm:group>
    <rpm:provides>
      <rpm:entry name="/bin/zsh"/>
    </rpm:provides>
  </format>
</package>
</metadata>
"#;

pub const FILELISTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<filelists xmlns="http://linux.duke.edu/metadata/filelists" packages="3">
<package pkgid="7ecdc096c65f9a508835e580bd2a8c9ec74e58c5e695695d8ee8b5e4f938974a" name="gnome-power-manager" arch="i686">
  <version epoch="0" ver="2.29.91" rel="1.fc13"/>
  <file>/usr/bin/gnome-power-manager</file>
  <file>/usr/bin/gnome-power-statistics</file>
  <file type="dir">/usr/share/gnome-power-manager</file>
</package>
<package pkgid="fe724a76369f74672d697d42d01c98d96679243be5677519511e6d4209119699" name="gnome-packagekit-debuginfo" arch="i686">
  <version epoch="0" ver="2.29.3" rel="2.fc13"/>
  <file>/usr/lib/debug/usr/bin/gpk-application.debug</file>
  <file>/usr/lib/debug/usr/bin/gpk-prefs.debug</file>
</package>
<package pkgid="a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e" name="zsh" arch="i686">
  <version epoch="1" ver="4.3.10" rel="7.fc13"/>
  <file>/bin/zsh</file>
  <file>/etc/zshrc</file>
</package>
</filelists>
"#;

pub const COMPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE comps PUBLIC "-//Red Hat, Inc.//DTD Comps info//EN" "comps.dtd">
<comps>
  <group>
    <id>admin-tools</id>
    <name>Administration Tools</name>
    <name xml:lang="de">Administrationswerkzeuge</name>
    <description>This group is a collection of graphical administration tools for the system.</description>
    <description xml:lang="de">Grafische Systemverwaltungswerkzeuge.</description>
    <default>true</default>
    <uservisible>true</uservisible>
    <packagelist>
      <packagereq type="mandatory">gnome-power-manager</packagereq>
      <packagereq type="default">gnome-packagekit</packagereq>
      <packagereq type="optional">system-config-lvm</packagereq>
      <packagereq type="conditional" requires="zsh">zsh-html</packagereq>
      <packagereq>setroubleshoot</packagereq>
    </packagelist>
  </group>
  <group>
    <id>shells</id>
    <name>Shells</name>
    <description>Alternative command shells.</description>
    <uservisible>0</uservisible>
    <packagelist>
      <packagereq type="optional">zsh</packagereq>
    </packagelist>
  </group>
  <group>
    <id>other</id>
    <name>Other</name>
    <description>Applications that do not fit another group.</description>
    <uservisible>true</uservisible>
    <packagelist>
      <packagereq type="default">gnome-packagekit</packagereq>
    </packagelist>
  </group>
  <category>
    <id>apps</id>
    <name>Applications</name>
    <name xml:lang="fr">Applications (fr)</name>
    <description>Applications to perform a variety of tasks</description>
    <display_order>20</display_order>
    <grouplist>
      <groupid>admin-tools</groupid>
      <groupid>other</groupid>
      <groupid>retired</groupid>
    </grouplist>
  </category>
  <category>
    <id>base-system</id>
    <name>Base System</name>
    <description>Various core pieces of the system.</description>
    <grouplist>
      <groupid>shells</groupid>
    </grouplist>
  </category>
</comps>
"#;

pub const UPDATEINFO_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<updates>
  <update from="updates@fedoraproject.org" status="stable" type="security" version="1.0">
    <id>FEDORA-2010-2345</id>
    <title>gnome-power-manager-2.29.91-1.fc13</title>
    <release>Fedora 13</release>
    <issued date="2010-02-22 12:00:00"/>
    <references>
      <reference href="https://bugzilla.redhat.com/show_bug.cgi?id=567890" id="567890" type="bugzilla" title="gpm crashes on resume"/>
      <reference href="http://cve.mitre.org/cgi-bin/cvename.cgi?name=CVE-2010-0001" id="CVE-2010-0001" type="cve"/>
    </references>
    <description>Fixes a crash when resuming from suspend.</description>
    <pkglist>
      <collection short="F13">
        <name>Fedora 13</name>
        <package name="gnome-power-manager" version="2.29.91" release="1.fc13" epoch="0" arch="i686" src="http://download.fedoraproject.org/pub/fedora/linux/updates/13/SRPMS/gnome-power-manager-2.29.91-1.fc13.src.rpm">
          <filename>gnome-power-manager-2.29.91-1.fc13.i686.rpm</filename>
        </package>
      </collection>
    </pkglist>
  </update>
  <update from="updates@fedoraproject.org" status="testing" type="bugfix" version="1.0">
    <id>FEDORA-2010-3456</id>
    <title>zsh-4.3.10-7.fc13</title>
    <issued date="2010-03-01 09:30:00"/>
    <reboot_suggested>True</reboot_suggested>
    <references/>
    <description>Rebuild against the new power manager.</description>
    <pkglist>
      <collection short="F13">
        <name>Fedora 13</name>
        <package name="zsh" version="4.3.10" release="7.fc13" epoch="1" arch="i686">
          <filename>zsh-4.3.10-7.fc13.i686.rpm</filename>
        </package>
        <package name="gnome-power-manager" version="2.29.91" release="1.fc13" epoch="0" arch="i686">
          <filename>gnome-power-manager-2.29.91-1.fc13.i686.rpm</filename>
        </package>
      </collection>
    </pkglist>
  </update>
</updates>
"#;

pub const METALINK_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<metalink version="3.0" xmlns="http://www.metalinker.org/" xmlns:mm0="http://fedorahosted.org/mirrormanager" type="dynamic">
 <files>
  <file name="repomd.xml">
   <mm0:timestamp>1266837637</mm0:timestamp>
   <size>3986</size>
   <verification>
    <hash type="sha256">9e3ec2fa8b0d1ef0aa28a3a34ab5c3d8b02c7cfd3e7a5a3e2ac9d6d3a08c51a2</hash>
   </verification>
   <resources maxconnections="1">
    <url protocol="http" type="http" location="US" preference="100">http://mirror.example.com/fedora/releases/$releasever/Everything/$basearch/os/repodata/repomd.xml</url>
    <url protocol="ftp" type="ftp" location="US" preference="99">ftp://mirror.example.com/fedora/releases/$releasever/Everything/$basearch/os/repodata/repomd.xml</url>
    <url protocol="rsync" type="rsync" location="US" preference="98">rsync://mirror.example.com/fedora/releases/11/Everything/i386/os/repodata/repomd.xml</url>
    <url protocol="http" type="http" location="DE" preference="60">http://ftp.example.de/pub/fedora/11/i386/os/repodata/repomd.xml</url>
    <url protocol="http" type="http" location="JP" preference="20">http://ftp.example.jp/fedora/11/i386/os/repodata/repomd.xml</url>
    <url protocol="http" type="http" location="BR" preference="high">http://mirror.example.br/fedora/11/i386/os/</url>
   </resources>
  </file>
 </files>
</metalink>
"#;

pub const MIRRORLIST_TXT: &str = "# repo = fedora-11 arch = i386 country = US
http://mirror.example.com/fedora/releases/$releasever/Everything/$basearch/os/

ftp://mirror.example.com/fedora/releases/11/Everything/i386/os/
http://ftp.example.de/pub/fedora/11/i386/os/
  http://indented.example.org/fedora/
https://secure.example.org/fedora/11/i386/os/
";

pub const PRIMARY_SQL: &str = "
CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT, name TEXT, arch TEXT,
    version TEXT, epoch TEXT, release TEXT, summary TEXT, description TEXT, url TEXT,
    rpm_license TEXT, rpm_group TEXT, size_package INTEGER, location_href TEXT);
CREATE TABLE provides (name TEXT, flags TEXT, epoch TEXT, version TEXT, release TEXT,
    pkgKey INTEGER);
INSERT INTO packages VALUES (1, '7ecdc096c65f9a508835e580bd2a8c9ec74e58c5e695695d8ee8b5e4f938974a',
    'gnome-power-manager', 'i686', '2.29.91', '0', '1.fc13', 'GNOME power management service',
    'GNOME Power Manager uses the information and facilities provided by HAL.',
    'http://projects.gnome.org/gnome-power-manager/', 'GPLv2+ and GFDL', 'Applications/System',
    2471824, 'Packages/gnome-power-manager-2.29.91-1.fc13.i686.rpm');
INSERT INTO packages VALUES (2, '53ae8bde9c68a3894e7ee13a7d6c1b7a4b5e8e9662767372e0c8413e903b98ce',
    'gnome-packagekit', 'i686', '2.29.3', '0', '2.fc13', 'Session applications to manage packages',
    'Applications to install and update software, including a power-aware update viewer.',
    'http://www.packagekit.org', 'GPLv2+', 'Applications/System', 1342211,
    'Packages/gnome-packagekit-2.29.3-2.fc13.i686.rpm');
INSERT INTO packages VALUES (3, 'a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e',
    'zsh', 'i686', '4.3.10', '1', '7.fc13', 'A powerful interactive shell',
    'The zsh shell is a command interpreter usable as an interactive login shell.',
    'http://zsh.sunsite.dk/', 'BSD', 'System Environment/Shells', NULL,
    'Packages/zsh-4.3.10-7.fc13.i686.rpm');
INSERT INTO packages VALUES (4, 'cafe', 'zsh', 'i686', '4.3.9', '1', '1.fc13',
    'A powerful interactive shell', NULL, NULL, 'BSD', 'System Environment/Shells', 2000000,
    'Packages/zsh-4.3.9-1.fc13.i686.rpm');
INSERT INTO provides VALUES ('gnome-power-manager', 'EQ', '0', '2.29.91', '1.fc13', 1);
INSERT INTO provides VALUES ('/bin/zsh', NULL, NULL, NULL, NULL, 3);
INSERT INTO provides VALUES ('/bin/zsh', NULL, NULL, NULL, NULL, 42);
";

pub const OTHER_SQL: &str = "
CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT);
CREATE TABLE changelog (pkgKey INTEGER, author TEXT, date INTEGER, changelog TEXT);
INSERT INTO packages VALUES (1, '7ecdc096c65f9a508835e580bd2a8c9ec74e58c5e695695d8ee8b5e4f938974a');
INSERT INTO packages VALUES (2, 'a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e');
INSERT INTO changelog VALUES (1, 'Richard Hughes <rhughes@redhat.com> - 2.29.1-1.fc13',
    1264075200, '- Update to 2.29.1');
INSERT INTO changelog VALUES (1, 'Richard Hughes <rhughes@redhat.com> - 2.29.91-1.fc13',
    1266840000, '- Update to 2.29.91');
INSERT INTO changelog VALUES (1, 'Matthias Clasen <mclasen@redhat.com> - 2.29.2-1.fc13',
    'yesterday', '- Update to 2.29.2');
INSERT INTO changelog VALUES (1, 'invalid', 1265000000, '- Unattributed change');
INSERT INTO changelog VALUES (2, 'Christopher Aillon <caillon@redhat.com>', 1262304000,
    '- Rebuild');
";

/// Writes `content` to `file_name` inside a fresh directory.
pub fn write_fixture(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Builds an SQLite store from `schema` inside a fresh directory.
pub fn sql_fixture(file_name: &str, schema: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    let mut conn = SqliteConnection::establish(&path.to_string_lossy()).unwrap();
    conn.batch_execute(schema).unwrap();
    (dir, path)
}

pub fn info(kind: MdKind, path: &std::path::Path) -> MdInfo {
    MdInfo::new("fedora", kind).with_filename(path)
}

pub fn terms(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
