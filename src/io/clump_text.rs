use crate::math::{Point, Real};
use crate::shape::{Clump, Sphere};
use crate::ClumpError;
use core::fmt::Write as _;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Formats a clump as `x,y,z,r` lines, one per sphere, in the clump order.
///
/// Numbers are written with the shortest representation that parses back to
/// the same value.
pub fn to_clump_text(clump: &Clump) -> String {
    let mut text = String::new();

    for sphere in clump.spheres() {
        let [x, y, z, r] = sphere.to_row();
        // Writing to a `String` cannot fail.
        let _ = writeln!(text, "{},{},{},{}", x, y, z, r);
    }

    text
}

/// Parses the `x,y,z,r` text format written by [`to_clump_text`].
///
/// Blank lines are ignored and fields may be surrounded by whitespace.
pub fn parse_clump_text(text: &str) -> Result<Clump, ClumpError> {
    read_clump_text(text.as_bytes())
}

fn parse_line(line: &str, line_number: usize) -> Result<Option<[Real; 4]>, ClumpError> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(None);
    }

    let error = |message: String| ClumpError::Parse {
        line: line_number,
        message,
    };

    let fields: Vec<_> = line.split(',').map(str::trim).collect();

    if fields.len() != 4 {
        return Err(error(format!(
            "expected 4 comma-separated values, found {}",
            fields.len()
        )));
    }

    let mut row = [0.0; 4];

    for (value, field) in row.iter_mut().zip(&fields) {
        *value = field
            .parse()
            .map_err(|e| error(format!("invalid number {:?}: {}", field, e)))?;
    }

    Ok(Some(row))
}

/// Writes a clump in the `x,y,z,r` text format.
pub fn write_clump_text(clump: &Clump, out: &mut impl Write) -> Result<(), ClumpError> {
    out.write_all(to_clump_text(clump).as_bytes())?;
    Ok(())
}

/// Reads a clump in the `x,y,z,r` text format.
pub fn read_clump_text(input: impl BufRead) -> Result<Clump, ClumpError> {
    let mut spheres = Vec::new();

    for (line_id, line) in input.lines().enumerate() {
        if let Some(row) = parse_line(&line?, line_id + 1)? {
            let center = Point::new(row[0], row[1], row[2]);
            spheres.push(Sphere::validated(spheres.len(), center, row[3])?);
        }
    }

    Ok(Clump::new(spheres))
}

/// Saves a clump to a `x,y,z,r` text file, usually with a `.csv` extension.
pub fn save_clump(clump: &Clump, path: impl AsRef<Path>) -> Result<(), ClumpError> {
    let mut file = std::fs::File::create(path)?;
    write_clump_text(clump, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Loads a clump from a `x,y,z,r` text file.
pub fn load_clump(path: impl AsRef<Path>) -> Result<Clump, ClumpError> {
    let file = std::fs::File::open(path)?;
    read_clump_text(BufReader::new(file))
}
