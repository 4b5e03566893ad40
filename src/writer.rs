//! Writing packets to disk.
//!
//! Each packet becomes `<output root>/<category>/<subcategory>.<extension>`.
//! The output format is a closed set: every [`OutputFormat`] variant maps to
//! exactly one [`PacketFormat`] implementation.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::result::Packet;

/// Serializes one packet to a byte stream.
pub trait PacketFormat {
    /// File extension, without the leading dot.
    fn extension(&self) -> &'static str;

    /// Writes the header and every row of `packet` to `out`.
    fn write_packet(&self, packet: &Packet, out: &mut dyn Write) -> io::Result<()>;
}

/// Comma-separated values with a header row.
///
/// Values are written in `column_names` order; a column a row does not
/// carry is written empty. Quoting follows RFC 4180 and only applies to
/// values that need it. Lines end with `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl PacketFormat for CsvFormat {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write_packet(&self, packet: &Packet, out: &mut dyn Write) -> io::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);
        writer.write_record(packet.column_names())?;
        for row in packet.rows() {
            writer.write_record(
                packet
                    .column_names()
                    .iter()
                    .map(|column| row.get(column).unwrap_or("")),
            )?;
        }
        writer.flush()
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: &'static [OutputFormat] = &[OutputFormat::Csv];

    /// The serializer for this format.
    #[must_use]
    pub fn encoder(self) -> &'static dyn PacketFormat {
        match self {
            OutputFormat::Csv => &CsvFormat,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        self.encoder().extension()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::invalid("output type", s, OutputFormat::ALL.iter().map(ToString::to_string))
            })
    }
}

/// Persists packets under an output root.
#[derive(Debug, Clone)]
pub struct Writer {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl Writer {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Where `packet` is written.
    #[must_use]
    pub fn packet_path(&self, packet: &Packet) -> PathBuf {
        self.output_dir
            .join(packet.category())
            .join(format!("{}.{}", packet.subcategory(), self.format.extension()))
    }

    /// Writes every packet in order, stopping at the first failure.
    ///
    /// Returns the written paths. Files written before a failure are left in place.
    pub fn dump(&self, packets: &[Packet]) -> Result<Vec<PathBuf>> {
        packets.iter().map(|packet| self.write(packet)).collect()
    }

    /// Writes one packet, creating its category directory when missing and
    /// replacing any existing file.
    pub fn write(&self, packet: &Packet) -> Result<PathBuf> {
        info!("Dumping {}-{}", packet.category(), packet.subcategory());

        let dir = self.output_dir.join(packet.category());
        if !dir.is_dir() {
            debug!(path = %dir.display(), "Creating directory");
            fs::create_dir_all(&dir).map_err(|source| Error::OutputUnwritable {
                path: dir.clone(),
                source,
            })?;
        }

        let path = self.packet_path(packet);
        let unwritable = |source| Error::OutputUnwritable {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(unwritable)?;
        let mut out = BufWriter::new(file);
        self.format
            .encoder()
            .write_packet(packet, &mut out)
            .map_err(unwritable)?;
        out.flush().map_err(unwritable)?;

        info!("Done! Output is in {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Row;

    fn packet(rows: Vec<Row>) -> Packet {
        Packet::new(
            "security",
            "recognized_machines",
            vec!["Browser".to_string(), "Created".to_string()],
            rows,
        )
        .expect("valid packet")
    }

    fn render(packet: &Packet) -> String {
        let mut buf = Vec::new();
        CsvFormat.write_packet(packet, &mut buf).expect("in-memory write");
        String::from_utf8(buf).expect("utf-8 output")
    }

    #[test]
    fn csv_writes_header_and_rows_in_column_order() {
        let row: Row = [("Created", "2020-01-01"), ("Browser", "Chrome")].into_iter().collect();
        assert_eq!(render(&packet(vec![row])), "Browser,Created\nChrome,2020-01-01\n");
    }

    #[test]
    fn csv_leaves_missing_columns_empty() {
        let row: Row = [("Created", "2020-01-01")].into_iter().collect();
        assert_eq!(render(&packet(vec![row])), "Browser,Created\n,2020-01-01\n");
    }

    #[test]
    fn csv_quotes_values_with_delimiters() {
        let row: Row = [("Browser", "Chrome, 80"), ("Created", "say \"hi\"")]
            .into_iter()
            .collect();
        assert_eq!(
            render(&packet(vec![row])),
            "Browser,Created\n\"Chrome, 80\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn header_only_for_empty_packet() {
        assert_eq!(render(&packet(Vec::new())), "Browser,Created\n");
    }

    #[test]
    fn output_format_parses_known_names() {
        assert_eq!("csv".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert_eq!("CSV".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn output_format_rejects_unknown_names() {
        let err = "xlsx".parse::<OutputFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "xlsx is not a valid output type. Enter one of: csv"
        );
    }

    #[test]
    fn packet_path_uses_category_and_extension() {
        let writer = Writer::new("data", OutputFormat::Csv);
        assert_eq!(
            writer.packet_path(&packet(Vec::new())),
            PathBuf::from("data/security/recognized_machines.csv")
        );
    }
}
