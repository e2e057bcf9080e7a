pub mod comps;
pub mod filelists_xml;
pub mod metalink;
pub mod mirrorlist;
pub mod other_sql;
pub mod primary_sql;
pub mod primary_xml;
pub mod updateinfo;

pub(crate) mod xml;

#[cfg(test)]
pub(crate) mod test_utils;
