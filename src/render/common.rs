use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{Cursor, Write};

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

#[inline]
pub fn create_writer() -> XmlWriter {
    Writer::new(Cursor::new(Vec::with_capacity(4096)))
}

fn start_elem<'a>(tag: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    elem
}

/// Write an opening tag with attributes: `<tag attr1="val1" ...>`.
#[inline]
pub fn write_start(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    writer.write_event(Event::Start(start_elem(tag, attrs)))?;
    Ok(())
}

#[inline]
pub fn write_end(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write a text element: `<tag>text</tag>`.
#[inline]
pub fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    write_start(writer, tag, &[])?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    write_end(writer, tag)
}

/// Write an empty element with attributes: `<tag attr1="val1" ... />`.
#[inline]
pub fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    writer.write_event(Event::Empty(start_elem(tag, attrs)))?;
    Ok(())
}

/// Write a link: `<a href="..">text</a>`.
pub fn write_link(writer: &mut XmlWriter, href: &str, text: &str) -> Result<()> {
    write_start(writer, "a", &[("href", href)])?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    write_end(writer, "a")
}

/// Write markup as-is (trusted input only).
#[inline]
pub fn write_raw(writer: &mut XmlWriter, markup: &str) -> Result<()> {
    writer.get_mut().write_all(markup.as_bytes())?;
    Ok(())
}

/// Take the written bytes as a string.
pub fn into_string(writer: XmlWriter) -> Result<String> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut XmlWriter) -> Result<()>) -> String {
        let mut writer = create_writer();
        f(&mut writer).unwrap();
        into_string(writer).unwrap()
    }

    #[test]
    fn test_text_element_escapes() {
        let html = written(|w| write_text_element(w, "h1", "Mouse & <Pad>"));
        assert_eq!(html, "<h1>Mouse &amp; &lt;Pad&gt;</h1>");
    }

    #[test]
    fn test_empty_elem_attrs() {
        let html = written(|w| write_empty_elem(w, "img", &[("src", "a\"b.png"), ("width", "600")]));
        assert_eq!(html, r#"<img src="a&quot;b.png" width="600"/>"#);
    }

    #[test]
    fn test_link() {
        let html = written(|w| write_link(w, "/catalog/product/x", "X"));
        assert_eq!(html, r#"<a href="/catalog/product/x">X</a>"#);
    }

    #[test]
    fn test_raw_is_not_escaped() {
        let html = written(|w| {
            write_start(w, "div", &[])?;
            write_raw(w, "<p><strong>bold</strong></p>")?;
            write_end(w, "div")
        });
        assert_eq!(html, "<div><p><strong>bold</strong></p></div>");
    }
}
