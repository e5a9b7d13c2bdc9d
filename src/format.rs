use std::io::{self, Write};

pub const CHARS_PER_BLOCK: usize = 5;
pub const BLOCKS_PER_LINE: usize = 5;

const BLOCK_SEPARATOR: &[u8] = b"  ";

pub fn write_password<W: Write>(out: &mut W, password: &[u8], format: bool) -> io::Result<()> {
    if !format {
        out.write_all(password)?;
        return out.write_all(b"\n");
    }

    for line in password.chunks(CHARS_PER_BLOCK * BLOCKS_PER_LINE) {
        for (i, block) in line.chunks(CHARS_PER_BLOCK).enumerate() {
            if i > 0 {
                out.write_all(BLOCK_SEPARATOR)?;
            }
            out.write_all(block)?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}
