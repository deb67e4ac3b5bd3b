use bevy::asset::{io::Reader, ron, Asset, AssetLoader, LoadContext};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use thiserror::Error;

/// 以单个 RON 文档保存的数据表
pub trait RonAsset: Asset + DeserializeOwned {
    const EXTENSIONS: &'static [&'static str];
}

/// 每种表一个 loader，按双扩展名（`*.items.ron`）区分
pub struct RonLoader<A> {
    _marker: PhantomData<fn() -> A>,
}

impl<A> Default for RonLoader<A> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[derive(Debug, Error)]
pub enum RonLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl<A: RonAsset> AssetLoader for RonLoader<A> {
    type Asset = A;
    type Settings = ();
    type Error = RonLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            let s = std::str::from_utf8(&bytes)?;
            let table: A = ron::de::from_str(s)?;

            Ok(table)
        }
    }

    fn extensions(&self) -> &[&str] {
        A::EXTENSIONS
    }
}
