//! Sitemap XML serializer
//!
//! Renders a [`Sitemap`] as a `urlset` document. The `image` namespace is
//! declared only when the sitemap was built with image inclusion enabled.

use super::{OutputError, OutputResult};
use crate::config::OutputConfig;
use crate::sitemap::{ImageEntry, Sitemap};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const IMAGE_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Writes `sitemap` as XML to `out`
///
/// Entries are written in commit order; all text content is escaped.
///
/// # Example
///
/// ```
/// use site_cartographer::output::write_sitemap;
/// use site_cartographer::{Sitemap, SitemapEntry};
/// use url::Url;
///
/// let entry = SitemapEntry::new(Url::parse("https://example.com/").unwrap());
/// let sitemap = Sitemap::new(vec![entry], false);
/// let bytes = write_sitemap(&sitemap, Vec::new()).unwrap();
/// let xml = String::from_utf8(bytes).unwrap();
/// assert!(xml.contains("<loc>https://example.com/</loc>"));
/// ```
pub fn write_sitemap<W: Write>(sitemap: &Sitemap, out: W) -> OutputResult<W> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    if sitemap.include_images() {
        urlset.push_attribute(("xmlns:image", IMAGE_NAMESPACE));
    }
    writer.write_event(Event::Start(urlset))?;

    for entry in sitemap.entries() {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", entry.loc.as_str())?;

        if sitemap.include_images() {
            for image in &entry.images {
                write_image(&mut writer, image)?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    Ok(out)
}

fn write_image<W: Write>(writer: &mut Writer<W>, image: &ImageEntry) -> OutputResult<()> {
    writer.write_event(Event::Start(BytesStart::new("image:image")))?;
    write_text_element(writer, "image:loc", image.loc.as_str())?;
    if let Some(caption) = &image.caption {
        write_text_element(writer, "image:caption", caption)?;
    }
    writer.write_event(Event::End(BytesEnd::new("image:image")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> OutputResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Renders `sitemap` into a string
pub fn to_xml_string(sitemap: &Sitemap) -> OutputResult<String> {
    let bytes = write_sitemap(sitemap, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
}

/// Writes the sitemap where the output configuration points
///
/// A `sitemap-path` of `-` writes to stdout.
pub fn write_sitemap_file(sitemap: &Sitemap, config: &OutputConfig) -> OutputResult<()> {
    if config.writes_to_stdout() {
        let stdout = io::stdout();
        let mut out = write_sitemap(sitemap, stdout.lock())?;
        out.flush()?;
        return Ok(());
    }

    let path = Path::new(&config.sitemap_path);
    let file = File::create(path)?;
    let mut out = write_sitemap(sitemap, BufWriter::new(file))?;
    out.flush()?;

    tracing::info!(
        "Wrote {} entries to {}",
        sitemap.len(),
        path.display()
    );
    Ok(())
}
