use crate::seo::{HeadTag, TagSet};
use anyhow::Result;

use super::common::{XmlWriter, write_empty_elem, write_end, write_start, write_text_element};

/// Write the whole `<head>` element.
pub fn write_head(writer: &mut XmlWriter, tags: &TagSet, refresh: Option<u64>) -> Result<()> {
    write_start(writer, "head", &[])?;
    write_empty_elem(writer, "meta", &[("charset", "utf-8")])?;
    write_empty_elem(
        writer,
        "meta",
        &[
            ("name", "viewport"),
            ("content", "width=device-width, initial-scale=1"),
        ],
    )?;

    if let Some(seconds) = refresh {
        let seconds = seconds.to_string();
        write_empty_elem(
            writer,
            "meta",
            &[("http-equiv", "refresh"), ("content", &seconds)],
        )?;
    }

    for tag in tags.iter() {
        match tag {
            HeadTag::Title(title) => write_text_element(writer, "title", title)?,
            HeadTag::Meta {
                key,
                value,
                content,
            } => write_empty_elem(writer, "meta", &[(key.attr(), value), ("content", content)])?,
        }
    }

    write_empty_elem(
        writer,
        "link",
        &[("rel", "shortcut icon"), ("href", "/favicon.ico")],
    )?;
    write_end(writer, "head")
}
