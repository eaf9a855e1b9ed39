use crate::error::StretchUtilsError;
use std::io::Write;

pub trait TableWriter {
    fn set_header(&mut self, items: &[String]);
    fn header(&self) -> &[String];
    fn write_row(&mut self, items: &[&str]) -> Result<(), StretchUtilsError>;
    fn write_header(&mut self) -> Result<(), StretchUtilsError> {
        let header: Vec<_> = self.header().iter().map(|x| x.to_string()).collect();
        self.write_row(&header.iter().map(|x| x.as_str()).collect::<Vec<&str>>())
    }
    fn flush(&mut self) -> Result<(), StretchUtilsError>;

    fn write_string_row(&mut self, items: &[String]) -> Result<(), StretchUtilsError> {
        self.write_row(&items.iter().map(|x| x.as_str()).collect::<Vec<&str>>())
    }
}

impl<T: TableWriter + ?Sized> TableWriter for Box<T> {
    fn set_header(&mut self, items: &[String]) {
        (**self).set_header(items)
    }
    fn header(&self) -> &[String] {
        (**self).header()
    }
    fn write_row(&mut self, items: &[&str]) -> Result<(), StretchUtilsError> {
        (**self).write_row(items)
    }
    fn write_header(&mut self) -> Result<(), StretchUtilsError> {
        (**self).write_header()
    }
    fn flush(&mut self) -> Result<(), StretchUtilsError> {
        (**self).flush()
    }
}

#[derive(Debug)]
pub struct TSVWriter<W: Write> {
    writer: W,
    header: Vec<String>,
}

impl<W: Write> TSVWriter<W> {
    pub fn new(writer: W) -> Self {
        TSVWriter {
            writer,
            header: Vec::new(),
        }
    }
}

impl<W: Write> TableWriter for TSVWriter<W> {
    fn set_header(&mut self, items: &[String]) {
        self.header.clear();
        self.header.extend_from_slice(items);
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn write_row(&mut self, items: &[&str]) -> Result<(), StretchUtilsError> {
        for (i, data) in items.iter().enumerate() {
            if i != 0 {
                self.writer.write_all(b"\t")?;
            }
            write!(self.writer, "{}", data)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StretchUtilsError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CSVWriter<W: Write> {
    writer: csv::Writer<W>,
    header: Vec<String>,
}

impl<W: Write> CSVWriter<W> {
    pub fn new(writer: W) -> Self {
        CSVWriter {
            writer: csv::Writer::from_writer(writer),
            header: Vec::new(),
        }
    }
}

impl<W: Write> TableWriter for CSVWriter<W> {
    fn set_header(&mut self, items: &[String]) {
        self.header.clear();
        self.header.extend_from_slice(items);
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn write_row(&mut self, items: &[&str]) -> Result<(), StretchUtilsError> {
        self.writer.write_record(items)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StretchUtilsError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_writer() -> Result<(), StretchUtilsError> {
        let mut write_buf: Vec<u8> = Vec::new();
        let mut tsv_writer = TSVWriter::new(&mut write_buf);
        tsv_writer.set_header(&["layer".to_string(), "start".to_string(), "end".to_string()]);
        tsv_writer.write_header()?;
        tsv_writer.write_row(&["Subgrade", "100", "150"])?;
        tsv_writer.write_string_row(&["Embankment EW".to_string(), "0".to_string()])?;

        let expected_bytes = br#"layer	start	end
Subgrade	100	150
Embankment EW	0
"#;
        assert_eq!(&expected_bytes[..], &write_buf[..]);

        Ok(())
    }

    #[test]
    fn test_csv_writer() -> Result<(), StretchUtilsError> {
        let mut write_buf: Vec<u8> = Vec::new();
        {
            let mut csv_writer = CSVWriter::new(&mut write_buf);
            csv_writer.set_header(&["bill".to_string(), "layer".to_string(), "len".to_string()]);
            csv_writer.write_header()?;
            csv_writer.write_row(&["RA-1", "Embankment, EW", "300"])?;
            csv_writer.flush()?;
        }

        let expected_bytes = br#"bill,layer,len
RA-1,"Embankment, EW",300
"#;
        assert_eq!(&expected_bytes[..], &write_buf[..]);

        Ok(())
    }
}
