//! In-memory `Store` backend.
//!
//! Enforces the same uniqueness rules as the real backend (unique username
//! and email per role namespace, one prescription per appointment) so
//! service-level tests exercise the genuine conflict paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::store::{
    Appointment, AppointmentStatus, Doctor, DoctorProfileUpdate, NewAppointment, NewDoctor,
    NewPatient, NewPrescription, PageParams, Patient, PatientProfileUpdate, Prescription, Store,
    StoreError,
};

#[derive(Default)]
struct Inner {
    patients: HashMap<String, Patient>,
    doctors: HashMap<String, Doctor>,
    appointments: BTreeMap<i64, Appointment>,
    prescriptions: HashMap<i64, Prescription>,
    next_appointment_id: i64,
    next_prescription_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_patient(&self, new: NewPatient) -> Result<Patient, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.patients.contains_key(&new.username) {
            return Err(StoreError::Conflict("patients.username".to_string()));
        }
        if inner.patients.values().any(|p| p.email == new.email) {
            return Err(StoreError::Conflict("patients.email".to_string()));
        }
        let now = Utc::now();
        let patient = Patient {
            username: new.username.clone(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            age: new.age,
            gender: new.gender,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.patients.insert(new.username, patient.clone());
        Ok(patient)
    }

    async fn get_patient(&self, username: &str) -> Result<Patient, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .patients
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn patient_username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.patients.contains_key(username))
    }

    async fn patient_email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.patients.values().any(|p| p.email == email))
    }

    async fn update_patient_profile(
        &self,
        username: &str,
        update: PatientProfileUpdate,
    ) -> Result<Patient, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(new_email) = &update.email {
            let taken = inner
                .patients
                .values()
                .any(|p| p.email == *new_email && p.username != username);
            if taken {
                return Err(StoreError::Conflict("patients.email".to_string()));
            }
        }
        let patient = inner
            .patients
            .get_mut(username)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = update.name {
            patient.name = name;
        }
        if let Some(email) = update.email {
            patient.email = email;
        }
        if let Some(phone) = update.phone {
            patient.phone = phone;
        }
        if let Some(age) = update.age {
            patient.age = age;
        }
        if let Some(gender) = update.gender {
            patient.gender = gender;
        }
        patient.updated_at = Utc::now();
        Ok(patient.clone())
    }

    async fn update_patient_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let patient = inner
            .patients
            .get_mut(username)
            .ok_or(StoreError::NotFound)?;
        patient.password_hash = password_hash.to_string();
        patient.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_patient(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .patients
            .remove(username)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn create_doctor(&self, new: NewDoctor) -> Result<Doctor, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.doctors.contains_key(&new.username) {
            return Err(StoreError::Conflict("doctors.username".to_string()));
        }
        if inner.doctors.values().any(|d| d.email == new.email) {
            return Err(StoreError::Conflict("doctors.email".to_string()));
        }
        let now = Utc::now();
        let doctor = Doctor {
            username: new.username.clone(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            gender: new.gender,
            specialization: new.specialization,
            qualification: new.qualification,
            experience: new.experience,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.doctors.insert(new.username, doctor.clone());
        Ok(doctor)
    }

    async fn get_doctor(&self, username: &str) -> Result<Doctor, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .doctors
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn doctor_username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.doctors.contains_key(username))
    }

    async fn doctor_email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.doctors.values().any(|d| d.email == email))
    }

    async fn update_doctor_profile(
        &self,
        username: &str,
        update: DoctorProfileUpdate,
    ) -> Result<Doctor, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(new_email) = &update.email {
            let taken = inner
                .doctors
                .values()
                .any(|d| d.email == *new_email && d.username != username);
            if taken {
                return Err(StoreError::Conflict("doctors.email".to_string()));
            }
        }
        let doctor = inner
            .doctors
            .get_mut(username)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = update.name {
            doctor.name = name;
        }
        if let Some(email) = update.email {
            doctor.email = email;
        }
        if let Some(phone) = update.phone {
            doctor.phone = phone;
        }
        if let Some(gender) = update.gender {
            doctor.gender = gender;
        }
        if let Some(specialization) = update.specialization {
            doctor.specialization = specialization;
        }
        if let Some(qualification) = update.qualification {
            doctor.qualification = qualification;
        }
        if let Some(experience) = update.experience {
            doctor.experience = experience;
        }
        doctor.updated_at = Utc::now();
        Ok(doctor.clone())
    }

    async fn update_doctor_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let doctor = inner
            .doctors
            .get_mut(username)
            .ok_or(StoreError::NotFound)?;
        doctor.password_hash = password_hash.to_string();
        doctor.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_doctor(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .doctors
            .remove(username)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_doctors(
        &self,
        page: PageParams,
        specialty: Option<&str>,
    ) -> Result<Vec<Doctor>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut doctors: Vec<Doctor> = inner
            .doctors
            .values()
            .filter(|d| specialty.map_or(true, |s| d.specialization == s))
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(doctors
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .collect())
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_appointment_id += 1;
        let id = inner.next_appointment_id;
        let now = Utc::now();
        let appointment = Appointment {
            id,
            patient_username: new.patient_username,
            doctor_username: new.doctor_username,
            doctor_name: new.doctor_name,
            appointment_date: new.appointment_date,
            appointment_time: new.appointment_time,
            specialty: new.specialty,
            symptoms: new.symptoms,
            status: AppointmentStatus::Upcoming,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        inner.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: i64) -> Result<Appointment, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_patient_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .appointments
            .values()
            .filter(|a| a.patient_username == username)
            .cloned()
            .collect())
    }

    async fn list_doctor_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .appointments
            .values()
            .filter(|a| a.doctor_username == username)
            .cloned()
            .collect())
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let appointment = inner.appointments.get_mut(&id).ok_or(StoreError::NotFound)?;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn set_appointment_notes(
        &self,
        id: i64,
        notes: &str,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let appointment = inner.appointments.get_mut(&id).ok_or(StoreError::NotFound)?;
        appointment.notes = Some(notes.to_string());
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .appointments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn create_prescription(
        &self,
        new: NewPrescription,
    ) -> Result<Prescription, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.prescriptions.contains_key(&new.appointment_id) {
            return Err(StoreError::Conflict(
                "prescriptions.appointment_id".to_string(),
            ));
        }
        inner.next_prescription_id += 1;
        let id = inner.next_prescription_id;
        let now = Utc::now();
        let prescription = Prescription {
            id,
            appointment_id: new.appointment_id,
            prescription_text: new.prescription_text,
            consultation_notes: new.consultation_notes,
            feedback_rating: None,
            feedback_comment: None,
            created_at: now,
            updated_at: now,
        };
        inner
            .prescriptions
            .insert(new.appointment_id, prescription.clone());
        Ok(prescription)
    }

    async fn get_prescription(&self, appointment_id: i64) -> Result<Prescription, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .prescriptions
            .get(&appointment_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_prescription(
        &self,
        appointment_id: i64,
        prescription_text: &str,
        consultation_notes: Option<String>,
    ) -> Result<Prescription, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let prescription = inner
            .prescriptions
            .get_mut(&appointment_id)
            .ok_or(StoreError::NotFound)?;
        prescription.prescription_text = prescription_text.to_string();
        prescription.consultation_notes = consultation_notes;
        prescription.updated_at = Utc::now();
        Ok(prescription.clone())
    }

    async fn set_prescription_feedback(
        &self,
        appointment_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Prescription, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let prescription = inner
            .prescriptions
            .get_mut(&appointment_id)
            .ok_or(StoreError::NotFound)?;
        prescription.feedback_rating = Some(rating);
        prescription.feedback_comment = comment;
        prescription.updated_at = Utc::now();
        Ok(prescription.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_patient(username: &str, email: &str) -> NewPatient {
        NewPatient {
            username: username.to_string(),
            name: "Test Patient".to_string(),
            email: email.to_string(),
            phone: "5550001".to_string(),
            age: 30,
            gender: "female".to_string(),
            password_hash: "$argon2$fake".to_string(),
        }
    }

    fn new_appointment(patient: &str, doctor: &str) -> NewAppointment {
        NewAppointment {
            patient_username: patient.to_string(),
            doctor_username: doctor.to_string(),
            doctor_name: "Dr. Test".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            appointment_time: "10:00".to_string(),
            specialty: "cardiology".to_string(),
            symptoms: "chest pain".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_patient_username_conflicts() {
        let store = MemoryStore::new();
        store
            .create_patient(new_patient("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = store
            .create_patient(new_patient("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_patient_email_conflicts() {
        let store = MemoryStore::new();
        store
            .create_patient(new_patient("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = store
            .create_patient(new_patient("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn appointment_ids_are_sequential_and_rows_start_upcoming() {
        let store = MemoryStore::new();
        let first = store
            .create_appointment(new_appointment("alice", "bob"))
            .await
            .unwrap();
        let second = store
            .create_appointment(new_appointment("alice", "bob"))
            .await
            .unwrap();
        assert_eq!(first.id + 1, second.id);
        assert_eq!(first.status, AppointmentStatus::Upcoming);
    }

    #[tokio::test]
    async fn second_prescription_for_same_appointment_conflicts() {
        let store = MemoryStore::new();
        let appointment = store
            .create_appointment(new_appointment("alice", "bob"))
            .await
            .unwrap();
        let new = NewPrescription {
            appointment_id: appointment.id,
            prescription_text: "rest".to_string(),
            consultation_notes: None,
        };
        store.create_prescription(new.clone()).await.unwrap();
        let err = store.create_prescription(new).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_appointment_then_get_is_not_found() {
        let store = MemoryStore::new();
        let appointment = store
            .create_appointment(new_appointment("alice", "bob"))
            .await
            .unwrap();
        store.delete_appointment(appointment.id).await.unwrap();
        assert!(matches!(
            store.get_appointment(appointment.id).await,
            Err(StoreError::NotFound)
        ));
    }
}
