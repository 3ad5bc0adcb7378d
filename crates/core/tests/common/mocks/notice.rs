use mockall::mock;
use nifpga_core::{Notice, NoticeSink};

mock! {
    pub Sink {}
    impl NoticeSink for Sink {
        fn emit(&self, notice: Notice);
    }
}
