fn main() {
    // Tauri build will embed Windows resources (icons) if RC.EXE is available.
    // The library alone builds without the desktop toolchain.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
