pub mod photo;

pub use photo::{
    BatchFileResult, BatchFileStatus, BatchUploadResponse, ExifData, PhotoListData,
    PhotoListResponse, PhotoMetadata, PhotoResponse, PhotoUpdate, UploadResponse, UploadedFile,
    UploadedFileResult,
};
