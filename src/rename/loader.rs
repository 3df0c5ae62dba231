//! load.php 资源包识别
//!
//! MediaWiki 通过 `load.php?...` 按查询参数返回打包的脚本和样式。
//! 镜像工具把查询字符串原样保存进文件名，这里把已知的五种组合
//! 映射为固定且易读的文件名。

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ArchiveError, ArchiveResult};

/// 服务端加载器的文件名前缀
pub const LOADER_PREFIX: &str = "load.php?";

/// 已知的 load.php 资源包
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderModule {
    SiteScripts,
    SiteStyles,
    SkinScripts,
    StartupScripts,
    ExtensionStyles,
}

impl LoaderModule {
    /// 匹配顺序固定，先命中者优先
    pub const ALL: [LoaderModule; 5] = [
        LoaderModule::SiteScripts,
        LoaderModule::SiteStyles,
        LoaderModule::SkinScripts,
        LoaderModule::StartupScripts,
        LoaderModule::ExtensionStyles,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            LoaderModule::SiteScripts => "modules=site&only=scripts",
            LoaderModule::SiteStyles => "modules=site&only=styles",
            LoaderModule::SkinScripts => "modules=skins.*&only=scripts",
            LoaderModule::StartupScripts => "modules=startup&only=scripts",
            LoaderModule::ExtensionStyles => "modules=.*ext.*&only=styles",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            LoaderModule::SiteScripts => "site_scripts.js",
            LoaderModule::SiteStyles => "site_modules.css",
            LoaderModule::SkinScripts => "skin_scripts.js",
            LoaderModule::StartupScripts => "startup_scripts.js",
            LoaderModule::ExtensionStyles => "ext.css",
        }
    }

    /// 识别加载器文件名；无法识别时返回错误而不是猜测
    pub fn classify(file_name: &str) -> ArchiveResult<LoaderModule> {
        let patterns = compiled_patterns();
        LoaderModule::ALL
            .iter()
            .zip(patterns.iter())
            .find(|(_, re)| re.is_match(file_name))
            .map(|(module, _)| *module)
            .ok_or_else(|| ArchiveError::UnknownLoader(file_name.to_string()))
    }
}

/// 文件名是否由服务端加载器生成
pub fn is_loader_file(file_name: &str) -> bool {
    file_name.starts_with(LOADER_PREFIX)
}

fn compiled_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        LoaderModule::ALL
            .iter()
            .map(|module| Regex::new(module.pattern()).expect("loader pattern is valid"))
            .collect()
    })
}
