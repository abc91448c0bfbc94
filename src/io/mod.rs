//! JSON persistence of matrices and settings.

use crate::algebra::*;
use crate::solvers::SolverSettings;
use serde::{de::DeserializeOwned, Serialize};
use std::io::{Read, Write};
use std::{fs::File, io};

/// Reading and writing of data types to JSON files
pub trait JsonReadWrite: Sized {
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

fn write_json<D: Serialize>(data: &D, file: &mut File) -> Result<(), io::Error> {
    let json = serde_json::to_string(data)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn read_json<D: DeserializeOwned>(file: &mut File) -> Result<D, io::Error> {
    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;
    let data = serde_json::from_str(&buffer)?;
    Ok(data)
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

impl<T> JsonReadWrite for CscMatrix<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        write_json(self, file)
    }

    /// Fails with `InvalidData` if the stored matrix is malformed
    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let A: CscMatrix<T> = read_json(file)?;
        A.check_format().map_err(invalid_data)?;
        Ok(A)
    }
}

impl<T> JsonReadWrite for TripletMatrix<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        write_json(self, file)
    }

    /// Fails with `InvalidData` on ragged arrays or out of range indices
    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let M: TripletMatrix<T> = read_json(file)?;
        let n = M.nzval.len();
        if M.rowval.len() != n || M.colval.len() != n {
            return Err(invalid_data("triplet arrays differ in length"));
        }
        if M.rowval.iter().any(|&r| r >= M.m) || M.colval.iter().any(|&c| c >= M.n) {
            return Err(invalid_data("triplet index out of range"));
        }
        Ok(M)
    }
}

impl<T> JsonReadWrite for SolverSettings<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        write_json(self, file)
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let settings: SolverSettings<T> = read_json(file)?;
        settings.validate().map_err(invalid_data)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::fillreduce::FillReducing;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn test_csc_json_io() {
        let A = CscMatrix::new(
            3,
            2,
            vec![0, 2, 3],
            vec![0, 2, 1],
            vec![1.5, -2., 1e-300],
        );

        let mut file = tempfile::tempfile().unwrap();
        A.write_to_file(&mut file).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let B = CscMatrix::<f64>::read_from_file(&mut file).unwrap();
        assert_eq!(A, B);
    }

    #[test]
    fn test_malformed_csc_rejected() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(br#"{"m":2,"n":1,"colptr":[0,1],"rowval":[5],"nzval":[1.0]}"#)
            .unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let err = CscMatrix::<f64>::read_from_file(&mut file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_settings_json_io() {
        let mut settings = SolverSettings::<f64>::default();
        settings.fill_reducing = FillReducing::Random;
        settings.seed = 17;

        let mut file = tempfile::tempfile().unwrap();
        settings.write_to_file(&mut file).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let read = SolverSettings::<f64>::read_from_file(&mut file).unwrap();
        assert_eq!(read.fill_reducing, FillReducing::Random);
        assert_eq!(read.seed, 17);
        assert_eq!(read.pivot_tol, settings.pivot_tol);
    }
}
