//! Adobe AIR application descriptors.

use crate::{error::AutoVersionError, version::Version};
use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use std::{fs, io, path::Path};

/// Namespace prefix shared by every AIR descriptor version.
pub const AIR_NAMESPACE_PREFIX: &str = "http://ns.adobe.com/air/application/";

const ROOT: &[u8] = b"application";
const VERSION: &[u8] = b"version";

/// Writes `version` into the descriptor at `path`.
///
/// Returns `Ok(false)` without touching anything if the file does not exist or is not an AIR
/// descriptor.
///
/// # Errors
///
/// Fails if the file cannot be read, parsed or written.
pub fn update_descriptor(path: &Path, version: Version) -> Result<bool, AutoVersionError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No AIR descriptor at {}", path.display());
            return Ok(false);
        }
        Err(e) => return Err(AutoVersionError::io(path, e)),
    };

    let Some(updated) = set_version(&text, &version.to_string())
        .map_err(|e| AutoVersionError::xml(path, e))?
    else {
        log::warn!("{} is not an AIR application descriptor", path.display());
        return Ok(false);
    };

    fs::write(path, updated).map_err(|e| AutoVersionError::io(path, e))?;
    log::info!("Set AIR descriptor {} to version {version}", path.display());
    Ok(true)
}

/// Replaces the text of the `<version>` child of the `<application>` root, or appends one.
///
/// Everything else in the document is written back as read. Returns `None` if the root is not
/// an AIR `<application>` element.
pub fn set_version(xml: &str, version: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    let mut written = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(element) if depth == 0 => {
                if !is_air_root(element)? {
                    return Ok(None);
                }
                depth += 1;
            }
            Event::Empty(element) if depth == 0 => {
                if !is_air_root(element)? {
                    return Ok(None);
                }
                // `<application/>`: expand it to hold the version
                writer.write_event(Event::Start(element.borrow()))?;
                write_version(&mut writer, version)?;
                writer.write_event(Event::End(element.to_end()))?;
                written = true;
                continue;
            }
            Event::Start(element) if depth == 1 && element.local_name().as_ref() == VERSION => {
                writer.write_event(Event::Start(element.borrow()))?;
                writer.write_event(Event::Text(BytesText::new(version)))?;
                // drop the old content, keep the closing tag
                let end = element.to_end().into_owned();
                reader.read_to_end(end.name())?;
                writer.write_event(Event::End(end))?;
                written = true;
                continue;
            }
            Event::Empty(element) if depth == 1 && element.local_name().as_ref() == VERSION => {
                writer.write_event(Event::Start(element.borrow()))?;
                writer.write_event(Event::Text(BytesText::new(version)))?;
                writer.write_event(Event::End(element.to_end()))?;
                written = true;
                continue;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && !written {
                    write_version(&mut writer, version)?;
                    written = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        writer.write_event(event)?;
    }

    if !written {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&writer.into_inner()).into_owned()))
}

fn is_air_root(element: &BytesStart<'_>) -> Result<bool, quick_xml::Error> {
    if element.local_name().as_ref() != ROOT {
        return Ok(false);
    }
    for attr in element.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if (key == b"xmlns" || key.starts_with(b"xmlns:"))
            && attr.unescape_value()?.starts_with(AIR_NAMESPACE_PREFIX)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

fn write_version(writer: &mut Writer<Vec<u8>>, version: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("version")))?;
    writer.write_event(Event::Text(BytesText::new(version)))?;
    writer.write_event(Event::End(BytesEnd::new("version")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_existing_version() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
            <application xmlns=\"http://ns.adobe.com/air/application/1.5\">\n\
            \t<id>com.example.app</id>\n\
            \t<version>1.0.0.0</version>\n\
            \t<!-- keep me -->\n\
            </application>\n";
        assert_eq!(
            set_version(xml, "2.1.0.7").unwrap().unwrap(),
            xml.replace("1.0.0.0</version>", "2.1.0.7</version>")
        );
    }

    #[rstest]
    #[case(
        "<application xmlns=\"http://ns.adobe.com/air/application/2.0\"><id>x</id></application>",
        "<application xmlns=\"http://ns.adobe.com/air/application/2.0\"><id>x</id><version>1.2.3.4</version></application>"
    )]
    #[case(
        "<application xmlns=\"http://ns.adobe.com/air/application/1.5\"><version/></application>",
        "<application xmlns=\"http://ns.adobe.com/air/application/1.5\"><version>1.2.3.4</version></application>"
    )]
    #[case(
        "<application xmlns=\"http://ns.adobe.com/air/application/1.5\"/>",
        "<application xmlns=\"http://ns.adobe.com/air/application/1.5\"><version>1.2.3.4</version></application>"
    )]
    fn test_inserts_version(#[case] xml: &str, #[case] expected: &str) {
        assert_eq!(set_version(xml, "1.2.3.4").unwrap().unwrap(), expected);
    }

    #[test]
    fn test_nested_version_untouched() {
        let xml = "<application xmlns=\"http://ns.adobe.com/air/application/1.5\">\
            <initialWindow><version>9</version></initialWindow>\
            <version>1.0.0.0</version></application>";
        assert_eq!(
            set_version(xml, "1.0.0.1").unwrap().unwrap(),
            xml.replace("1.0.0.0", "1.0.0.1")
        );
    }

    #[rstest]
    #[case("<application><version>1</version></application>")]
    #[case("<manifest xmlns=\"http://ns.adobe.com/air/application/1.5\"/>")]
    #[case("<application xmlns=\"http://example.com/other\"/>")]
    fn test_not_a_descriptor(#[case] xml: &str) {
        assert_eq!(set_version(xml, "1.2.3.4").unwrap(), None);
    }

    #[test]
    fn test_update_descriptor_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.xml");

        assert!(!update_descriptor(&path, Version::new(1, 0, 0, 1)).unwrap());
        assert!(!path.exists());

        fs::write(
            &path,
            "<application xmlns=\"http://ns.adobe.com/air/application/1.5\"><version>1.0.0.0</version></application>",
        )
        .unwrap();
        assert!(update_descriptor(&path, Version::new(1, 0, 0, 1)).unwrap());
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("<version>1.0.0.1</version>"));
    }
}
