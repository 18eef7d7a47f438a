fn main() -> anyhow::Result<()> {
    rkmerson::demo::scalar_decay::run()?;
    rkmerson::demo::harmonic_oscillator::run()?;
    Ok(())
}
