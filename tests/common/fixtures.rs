//! Test fixture helpers for creating map/disassembly pairs

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// Map file for A (10 bytes), B (20 bytes), C (5 bytes)
pub const SCENARIO_MAP: &str = "\
Memory Configuration

Name             Origin             Length             Attributes
FLASH            0x08000000         0x00100000         xr

Linker script and memory map

 .text.A
                0x08000000        0xa build/a.o
 .text.B
                0x08000010       0x14 build/b.o
 .text.C
                0x08000030        0x5 build/c.o
";

/// A calls B and C, B calls C, C tail-branches to A
pub const SCENARIO_LISTING: &str = "\

firmware.elf:     file format elf32-littlearm


Disassembly of section .text:

08000000 <A>:
 8000000:\tb580      \tpush\t{r7, lr}
 8000002:\tf000 f805 \tbl\t8000010 <B>
 8000006:\tf000 f813 \tbl\t8000030 <C>
 800000a:\tbd80      \tpop\t{r7, pc}

08000010 <B>:
 8000010:\tb580      \tpush\t{r7, lr}
 8000012:\tf000 f80d \tbl\t8000030 <C>
 8000016:\tbd80      \tpop\t{r7, pc}

08000030 <C>:
 8000030:\t2000      \tmovs\tr0, #0
 8000032:\te7e5      \tb.w\t8000000 <A>
";

/// x86-64 listing where `main` calls `helper` and `helper` calls `main`
pub const CYCLE_MAP: &str = "\
 .text.main
                0x0000000000401000       0x30 main.o
 .text.helper
                0x0000000000401030       0x18 main.o
";

/// Companion listing for [`CYCLE_MAP`]
pub const CYCLE_LISTING: &str = "\
0000000000401000 <main>:
  401000:\te8 2b 00 00 00       \tcall   401030 <helper>
  401005:\tc3                   \tret

0000000000401030 <helper>:
  401030:\te8 cb ff ff ff       \tcall   401000 <main>
  401035:\tc3                   \tret
";

/// A temporary directory holding one map file and one listing
pub struct FootprintProject {
    dir: TempDir,
    map: PathBuf,
    disasm: PathBuf,
}

impl FootprintProject {
    /// Project directory (config files are looked up here)
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path to the map file
    pub fn map_path(&self) -> &Path {
        &self.map
    }

    /// Path to the disassembly listing
    pub fn disasm_path(&self) -> &Path {
        &self.disasm
    }

    /// Write `.fn-footprint.toml` into the project directory
    pub fn write_config(&self, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(".fn-footprint.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Creates a project from arbitrary map and listing text
pub fn create_project(map: &str, listing: &str) -> anyhow::Result<FootprintProject> {
    create_project_bytes(map.as_bytes(), listing.as_bytes())
}

/// Creates a project from raw bytes, for inputs that are not valid UTF-8
pub fn create_project_bytes(map: &[u8], listing: &[u8]) -> anyhow::Result<FootprintProject> {
    let dir = TempDir::new()?;
    let map_path = dir.path().join("firmware.map");
    let disasm_path = dir.path().join("firmware.lst");

    fs::write(&map_path, map)?;
    fs::write(&disasm_path, listing)?;

    Ok(FootprintProject {
        dir,
        map: map_path,
        disasm: disasm_path,
    })
}

/// A/B/C project with a tail branch from C back to A
pub fn scenario_project() -> anyhow::Result<FootprintProject> {
    create_project(SCENARIO_MAP, SCENARIO_LISTING)
}

/// Two functions that call each other
pub fn cycle_project() -> anyhow::Result<FootprintProject> {
    create_project(CYCLE_MAP, CYCLE_LISTING)
}

/// Synthetic map with `count` functions named `fn_0..fn_N`, each `size` bytes
pub fn synthetic_map(count: usize, size: u64) -> String {
    let mut out = String::new();
    for i in 0..count {
        out.push_str(&format!(" .text.fn_{}\n", i));
        out.push_str(&format!(
            "                0x{:08x} {:#10x} build/fn_{}.o\n",
            0x0800_0000 + i as u64 * size,
            size,
            i
        ));
    }
    out
}

/// Synthetic listing where `fn_i` calls `fn_{i+1}` and `fn_{2i+1}`
pub fn synthetic_listing(count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        out.push_str(&format!("{:08x} <fn_{}>:\n", 0x0800_0000 + i * 16, i));
        for callee in [i + 1, 2 * i + 1] {
            if callee < count {
                out.push_str(&format!(
                    " {:7x}:\tf000 f800 \tbl\t{:x} <fn_{}>\n",
                    0x0800_0000 + i * 16,
                    0x0800_0000 + callee * 16,
                    callee
                ));
            }
        }
        out.push('\n');
    }
    out
}
