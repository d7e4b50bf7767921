use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub trait Bus {
    fn read_u8(&mut self, addr: u32) -> Result<u8>;
    fn read_u16(&mut self, addr: u32) -> Result<u16>;
    fn read_u32(&mut self, addr: u32) -> Result<u32>;
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<()>;
    fn write_u16(&mut self, addr: u32, val: u16) -> Result<()>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()>;
}

/// Flat, zero-initialized, byte-addressable memory. Every access is bounds
/// checked; an access that runs off the end is an error, not a wrap.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self { mem: vec![0; size] }
    }

    /// Copy a program image to address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        ensure!(
            image.len() <= self.mem.len(),
            "image of {} bytes does not fit in {} bytes of memory",
            image.len(),
            self.mem.len()
        );
        self.mem[..image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    fn range(&self, addr: u32, width: usize) -> Result<usize> {
        let off = addr as usize;
        ensure!(
            off.checked_add(width).is_some_and(|end| end <= self.mem.len()),
            "{width}-byte access at {addr:#010x} outside {} bytes of memory",
            self.mem.len()
        );
        Ok(off)
    }

    fn load_le<const N: usize>(&self, addr: u32) -> Result<[u8; N]> {
        let off = self.range(addr, N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.mem[off..off + N]);
        Ok(buf)
    }

    fn store_le(&mut self, addr: u32, bytes: &[u8]) -> Result<()> {
        let off = self.range(addr, bytes.len())?;
        self.mem[off..off + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl std::fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearMemory")
            .field("size", &self.mem.len())
            .finish()
    }
}

impl Bus for LinearMemory {
    fn read_u8(&mut self, addr: u32) -> Result<u8> {
        Ok(self.load_le::<1>(addr)?[0])
    }
    fn read_u16(&mut self, addr: u32) -> Result<u16> {
        Ok(u16::from_le_bytes(self.load_le(addr)?))
    }
    fn read_u32(&mut self, addr: u32) -> Result<u32> {
        Ok(u32::from_le_bytes(self.load_le(addr)?))
    }
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<()> {
        self.store_le(addr, &[val])
    }
    fn write_u16(&mut self, addr: u32, val: u16) -> Result<()> {
        self.store_le(addr, &val.to_le_bytes())
    }
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()> {
        self.store_le(addr, &val.to_le_bytes())
    }
}
