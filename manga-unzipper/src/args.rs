use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(about, author, version)]
pub struct Args {
    /// The zip archives to convert, one pdf is written per archive
    #[clap(required_unless_present = "manifest")]
    pub archives: Vec<Utf8PathBuf>,
    /// The output directory for the pdf files, it must already exist
    #[clap(short, long, default_value = "./")]
    pub outdir: Utf8PathBuf,
    /// A json manifest `{"archives": "a.zip" | ["a.zip", ...], "outdir": "..."}`,
    /// its archives are converted along with the ones given as arguments
    #[clap(short, long)]
    pub manifest: Option<Utf8PathBuf>,
    /// Where the extraction workspaces are created, defaults to the system temp directory
    #[clap(long)]
    pub temp_root: Option<Utf8PathBuf>,
    /// Delete each extraction workspace once its archive is converted
    #[clap(long, action)]
    pub cleanup: bool,
}
