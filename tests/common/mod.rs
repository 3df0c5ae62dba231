// 集成测试公共模块
//
// 在临时目录中搭建一个最小的镜像站点

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use wiki_archive::core::ArchiveOptions;

pub const SITE_STYLES_LOADER: &str =
    "load.php?debug=false&lang=en&modules=site&only=styles&skin=cppreference2";
pub const EXT_STYLES_LOADER: &str =
    "load.php?debug=false&lang=en&modules=ext.rtlcite&only=styles&skin=cppreference2";

pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<link rel="stylesheet" href="../mwiki/load.php?debug=false&amp;lang=en&amp;modules=site&amp;only=styles&amp;skin=cppreference2">
<link rel="search" href="../mwiki/opensearch_desc.php">
</head>
<body>
<div class="noprint">navigation</div>
<img src="../../upload.cppreference.com/mwiki/images/say%22hi%22.png">
<link rel="stylesheet" href="../../upload.cppreference.com/mwiki/foo.css%3Fx%3D1">
<a href="numeric/math/NAN.html">NAN</a>
<noscript><img src="../../upload.cppreference.com/mwiki/images/a.png"></noscript>
<a href="http://en.cppreference.com/w/">online</a>
<script src="http://www.google-analytics.com/ga.js"></script>
</body>
</html>
"#;

/// 测试用镜像构建器
pub struct MirrorBuilder {
    dir: TempDir,
}

impl MirrorBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn src(&self) -> PathBuf {
        self.root().join("reference")
    }

    pub fn dst(&self) -> PathBuf {
        self.root().join("output")
    }

    pub fn supplement(&self) -> PathBuf {
        self.root().join("preprocess-css.css")
    }

    /// 在源镜像中写入文件，必要时创建目录
    pub fn file(self, relative: &str, contents: &str) -> Self {
        let path = self.src().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
        fs::write(&path, contents).expect("write file");
        self
    }

    /// 一个包含所有待处理情形的完整镜像
    pub fn standard() -> Self {
        let upload = "upload.cppreference.com/mwiki";
        let lang = "en.cppreference.com";

        Self::new()
            .file(&format!("{upload}/images/a.png"), "png")
            .file(&format!("{upload}/images/say\"hi\".png"), "png")
            .file(&format!("{upload}/foo.css?x=1"), "a{}")
            .file(&format!("{upload}/index.php"), "dropped")
            .file(
                &format!("{lang}/mwiki/{SITE_STYLES_LOADER}"),
                "@font-face{src:url('../DejaVuSansMonoCondensed60.ttf')}\ntr td:nth-child(1){}\n",
            )
            .file(
                &format!("{lang}/mwiki/{EXT_STYLES_LOADER}"),
                "li:nth-child(1){font:url('../DejaVuSansMonoCondensed75.ttf')}",
            )
            .file(&format!("{lang}/DejaVuSansMonoCondensed60.ttf"), "font60")
            .file(&format!("{lang}/DejaVuSansMonoCondensed75.ttf"), "font75")
            .file(&format!("{lang}/robots.txt"), "dropped")
            .file(&format!("{lang}/w/cpp/page.html"), PAGE_HTML)
            .file(
                &format!("{lang}/w/cpp/numeric/math/NAN.html"),
                "<html><body>NAN</body></html>",
            )
            .file(
                &format!("{lang}/w/cpp/numeric/math/nan.html"),
                "<html><body>nan</body></html>",
            )
            .with_supplement("td:nth-child(1){width:1px}\n")
    }

    pub fn with_supplement(self, contents: &str) -> Self {
        fs::write(self.supplement(), contents).expect("write supplement");
        self
    }

    pub fn options(&self) -> ArchiveOptions {
        ArchiveOptions {
            src: self.src(),
            dst: self.dst(),
            css_supplement: self.supplement(),
            jobs: Some(2),
            ..ArchiveOptions::default()
        }
    }

    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.dst().join(relative)).expect("read output file")
    }
}
