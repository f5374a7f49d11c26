fn main() -> anyhow::Result<()> {
    tmx2c::run()
}
